//! 硬件抽象层 (HAL)
//!
//! 协议层与底层硬件之间的接缝：
//!
//! - [`bus`]: 32 位寄存器总线 trait 与 MMIO 实现
//! - [`topology`]: 实例号到寄存器窗口的解析
//! - [`gate`]: 忙位轮询（完成门）
//! - [`platform`]: 外部协作者与上电流程

pub mod bus;
pub mod gate;
pub mod platform;
pub mod topology;

// 重新导出常用类型
pub use bus::{Mmio, RegisterBus};
pub use gate::{Backoff, Clock, Poller, Spin, WaitPolicy};
pub use platform::{
    Armed, ArmedBus, Bringup, BusInterface, Committed, PinMode, PinPlan, PinRouting, Routing,
    StatusIndicator,
};
pub use topology::{PeripheralInstance, PeripheralKind, Topology, TopologyConfig};
