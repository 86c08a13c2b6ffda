//! # 外设控制器
//!
//! 在 [`hal`](crate::hal) 提供的总线、拓扑和完成门之上，实现 SPI 主机与
//! UART 发送器的配置和事务顺序。
//!
//! ## 模块结构
//!
//! - [`traits`]: 配置类型状态、事务状态机、`Controller` trait
//! - [`macros`]: 寄存器块与位域宏
//! - [`spi`]: SPI 控制器
//! - [`uart`]: UART 控制器
//! - [`fleet`]: 多实例集合
//!
//! ## 支持的外设
//!
//! | 外设 | 控制器 | 事务 | 完成门 |
//! |------|--------|------|--------|
//! | SPI | `SpiController` | 单字节 / 帧 | STATUS.BUSY 清零 |
//! | UART | `UartController` | 字节序列 | 无（可选 `flush`） |
//!
//! ## 使用示例
//!
//! ```rust
//! use neon_periph::config::{SPI_TOPOLOGY, UART_TOPOLOGY};
//! use neon_periph::drivers::{SpiConfig, SpiFleet, UartConfig, UartFleet};
//! use neon_periph::hal::{ArmedBus, Topology};
//! use neon_periph::sim::SimBus;
//!
//! let bus = SimBus::armed();
//! let armed = ArmedBus::assume_armed(&bus);
//!
//! let spi = Topology::new(SPI_TOPOLOGY).unwrap();
//! let mut spis = SpiFleet::configure(armed, &spi, SpiConfig::default()).unwrap();
//! for (i, ctrl) in spis.iter_mut().enumerate() {
//!     ctrl.transact(0xA0 + i as u8);
//! }
//!
//! let uart = Topology::new(UART_TOPOLOGY).unwrap();
//! let mut uarts = UartFleet::configure(armed, &uart, UartConfig::default()).unwrap();
//! uarts.get_mut(0).unwrap().transact(b"Hello\n");
//! ```

pub mod fleet;
pub mod macros;
pub mod spi;
pub mod traits;
pub mod uart;

// 重新导出常用类型
pub use fleet::Fleet;
pub use spi::{SpiConfig, SpiController, SpiFleet};
pub use traits::{ConfigState, Configured, Controller, SpiMode, TransactionState, Unconfigured};
pub use uart::{UartConfig, UartController, UartFleet};
