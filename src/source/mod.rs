pub mod download;
pub mod passthrough;
pub mod records;
pub mod region;
pub mod xml_tree;
