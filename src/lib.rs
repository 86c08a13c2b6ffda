//! 共享总线上多实例 SPI / UART 控制器的寄存器级控制层
//!
//! - [`hal`]: 寄存器总线、实例窗口解析、完成门、上电流程
//! - [`regs`]: 寄存器偏移与位域
//! - [`drivers`]: 配置顺序与事务顺序
//! - [`sim`]: 仿真总线与板级协作者（`spin` feature）

#![cfg_attr(not(test), no_std)]
#[cfg(test)]
extern crate std;
extern crate alloc;

pub mod compat;
pub mod config;
pub mod drivers;
pub mod error;
pub mod hal;
pub mod log;
pub mod mem;
pub mod regs;
#[cfg(feature = "spin")]
pub mod sim;

pub use error::{PeriphError, Result};
pub use paste;
