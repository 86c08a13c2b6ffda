//! 兼容层模块
//!
//! 统一处理 no_std 和 test 环境的类型导入，避免在多个文件中重复编写条件编译代码。
//!
//! # 使用方法
//!
//! ```rust,ignore
//! use crate::compat::{Vec, VecDeque, BTreeMap};
//! ```

#[cfg(not(test))]
pub use alloc::{
    collections::{BTreeMap, VecDeque},
    vec::Vec,
};

#[cfg(test)]
pub use std::{
    collections::{BTreeMap, VecDeque},
    vec::Vec,
};
