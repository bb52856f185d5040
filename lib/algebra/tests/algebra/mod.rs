mod visitor;
