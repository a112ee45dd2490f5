pub mod dto;

pub use dto::{
    Acknowledgement, DebrisRequest, ProcessingReport, RocketQuery, TimestampBounds,
    TrajectoryRequest, UploadText,
};
