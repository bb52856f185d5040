#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod query_utils;

pub mod model {
    pub use querykit_model::*;
}

pub mod algebra {
    pub use querykit_algebra::*;
}

pub mod builder {
    pub use querykit_builder::*;
}

pub mod sparql {
    pub use querykit_sparql::*;
}
