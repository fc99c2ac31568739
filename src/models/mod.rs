pub mod api_result;
pub mod compiler;
pub mod contest;
pub mod cph;
pub mod problem;
pub mod rank;
pub mod response;
pub mod submission;

pub use api_result::ApiResult;
pub use compiler::Compiler;
pub use contest::{ContestConfig, ContestInfo};
pub use cph::{CphProb, CphTest};
pub use problem::{ContestBasicInfo, ContestProblemList, Problem, ProblemExample, ProblemExtra, ProblemInfo};
pub use rank::{RankRow, RealtimeRank};
pub use response::Response;
pub use submission::{JudgeStatus, SubmissionList, SubmissionListItem, SubmissionStatus, SubmitRequest};
