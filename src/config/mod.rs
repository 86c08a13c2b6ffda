//! 板级配置
//!
//! 参考 SoC 的拓扑预设、默认配置值和引脚规划。
//! 这些值只是预设，核心逻辑全部通过 [`TopologyConfig`] 显式传入。

use crate::hal::platform::{PinMode, PinPlan};
use crate::hal::topology::{PeripheralKind, TopologyConfig};

// 外设窗口
pub const WINDOW_STRIDE: usize = 0x1_0000; // 64KB，寄存器偏移最大到 0xFF10
pub const SPI_ORIGIN: usize = 0x3008_0000;
pub const SPI_COUNT: usize = 5;
pub const UART_ORIGIN: usize = 0x3000_0000;
pub const UART_COUNT: usize = 8;

// 默认配置值
pub const SPI_DEFAULT_PRESCALER: u32 = 0x40;
pub const UART_DEFAULT_TX_THRESHOLD: u32 = 3;
pub const UART_TX_FIFO_DEPTH: usize = 16;

// 固件堆，只用于控制器集合
pub const HEAP_SIZE: usize = 4 * 1024;

/// SPI 拓扑预设：5 个实例，0x3008_0000 起
pub const SPI_TOPOLOGY: TopologyConfig = TopologyConfig {
    kind: PeripheralKind::Spi,
    instance_count: SPI_COUNT,
    origin_address: SPI_ORIGIN,
    stride: WINDOW_STRIDE,
};

/// UART 拓扑预设：8 个实例，0x3000_0000 起
pub const UART_TOPOLOGY: TopologyConfig = TopologyConfig {
    kind: PeripheralKind::Uart,
    instance_count: UART_COUNT,
    origin_address: UART_ORIGIN,
    stride: WINDOW_STRIDE,
};

// SPI i 占用 17+4i 起的 4 个引脚：MISO, MOSI, SCLK, CSB
const SPI_PIN_BASE: u8 = 17;

// UART (TX, RX)，第 8 号引脚不可用
const UART_PINS: [(u8, u8); UART_COUNT] = [
    (1, 0),
    (3, 2),
    (5, 4),
    (7, 6),
    (10, 9),
    (12, 11),
    (14, 13),
    (16, 15),
];

/// SPI 实例的引脚规划
///
/// 超出板上实例数时返回 `None`。
pub fn spi_pin_plan(index: usize) -> Option<PinPlan> {
    if index >= SPI_COUNT {
        return None;
    }
    let base = SPI_PIN_BASE + (index as u8) * 4;
    Some(PinPlan::new(&[
        (base, PinMode::InputPullUp),
        (base + 1, PinMode::Output),
        (base + 2, PinMode::Output),
        (base + 3, PinMode::Output),
    ]))
}

/// UART 实例的引脚规划
pub fn uart_pin_plan(index: usize) -> Option<PinPlan> {
    let (tx, rx) = *UART_PINS.get(index)?;
    Some(PinPlan::new(&[(tx, PinMode::Output), (rx, PinMode::InputPullUp)]))
}
