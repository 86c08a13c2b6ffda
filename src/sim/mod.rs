//! # 仿真实现
//!
//! 提供基于 hal traits 的仿真实现，用于：
//! - 单元测试和集成测试
//! - 在没有真实硬件时验证寄存器协议顺序
//!
//! ## 可用组件
//!
//! | 组件 | 说明 |
//! |------|------|
//! | [`SimBus`] | 共享寄存器总线，带访问记录与接口门 |
//! | [`SimPins`] | 引脚路由 |
//! | [`SimIndicator`] | 状态指示输出 |
//! | [`SteppingClock`] | 固定步长时钟 |
//! | [`CountingBackoff`] | 计数退避 |

mod board;
mod bus;

pub use board::{CountingBackoff, SimIndicator, SimPins, SteppingClock};
pub use bus::{Access, SimBus};
