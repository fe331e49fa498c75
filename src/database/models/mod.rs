pub mod advisor;
pub mod feedback;
