//! Parameter and result shapes of the operations the engine knows.
//!
//! The bridge does not run any of these. It only needs their shapes to
//! encode requests and to hand typed results back to callers.

use serde::{Deserialize, Serialize};

use super::{Command, Request};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciInput {
    pub n: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciResult {
    pub value: u64,
    pub computation_time_ms: u64,
    pub n: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[default]
    #[serde(rename = "sha256")]
    Sha256,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashDataInput {
    pub data: String,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashDataResult {
    pub hash: String,
    pub algorithm: HashAlgorithm,
    pub input_length: usize,
    pub computation_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    #[default]
    Parallel,
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortNumbersInput {
    pub numbers: Vec<i32>,
    #[serde(default)]
    pub algorithm: SortAlgorithm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortNumbersResult {
    pub sorted_numbers: Vec<i32>,
    pub algorithm: SortAlgorithm,
    pub input_length: usize,
    pub computation_time_ms: u64,
}

fn default_use_parallel() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindPrimesInput {
    pub limit: u32,
    #[serde(default = "default_use_parallel")]
    pub use_parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindPrimesResult {
    pub primes: Vec<u32>,
    pub count: usize,
    pub limit: u32,
    pub computation_time_ms: u64,
    pub used_parallel: bool,
}

/// Drain the log lines the engine buffered since the last call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogsRequest;

impl From<LogsRequest> for Command {
    fn from(_: LogsRequest) -> Self {
        Command::Logs
    }
}

impl Request for LogsRequest {
    type Output = Vec<String>;
}

macro_rules! request {
    ($input:ty => $variant:ident, $output:ty) => {
        impl From<$input> for Command {
            fn from(input: $input) -> Self {
                Command::$variant(input)
            }
        }

        impl Request for $input {
            type Output = $output;
        }
    };
}

request!(FibonacciInput => Fibonacci, FibonacciResult);
request!(HashDataInput => HashData, HashDataResult);
request!(SortNumbersInput => SortNumbers, SortNumbersResult);
request!(FindPrimesInput => FindPrimes, FindPrimesResult);
