//! # 寄存器映射
//!
//! SPI 与 UART 共用同一种窗口布局：低偏移是工作寄存器，
//! 窗口顶部 `0xFE00..=0xFF10` 是 FIFO / 中断 / 时钟门控块。
//! 最大偏移 GCLK 在 0xFF10，因此每个实例至少需要 64KB 的 stride。
//!
//! 偏移、字段宽度和读改写语义都必须与硬件逐位一致。

pub mod spi;
pub mod uart;

/// GCLK 寄存器：bit0 时钟门控使能
pub const GCLK_ENABLE: u32 = 1;

/// FIFO 电平字段，bit 4:0（深度 16 需要 5 位）
pub const FIFO_LEVEL_MASK: u32 = 0x1F;

/// FIFO 阈值字段，bit 3:0
pub const FIFO_THRESHOLD_MAX: u32 = 0xF;

/// 预分频寄存器字段宽度（16 bit）
pub const PRESCALER_MAX: u32 = 0xFFFF;
