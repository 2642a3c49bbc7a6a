mod gridfs;

pub use gridfs::{GridFsLayer, GridFsService};
