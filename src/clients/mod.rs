pub mod nowcoder_client;
#[cfg(test)]
pub(crate) mod scripted;

pub use nowcoder_client::{JudgeApi, NowcoderClient};
