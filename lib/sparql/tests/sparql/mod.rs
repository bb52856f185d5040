mod graph_queries;
mod round_trip;
