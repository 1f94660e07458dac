mod forest_properties;
mod scenarios;
mod support;
