//! # 寄存器窗口解析
//!
//! 把逻辑实例号 `0..N-1` 映射到基地址：`origin + index * stride`。
//!
//! ```text
//! origin            origin+stride      origin+2*stride
//!   │ span  │ 空洞    │ span  │ 空洞     │ ...
//!   └───────┴─────────┴───────┴──────────┘
//!    实例 0             实例 1
//! ```
//!
//! stride 至少是寄存器跨度向上取整到 2 的幂，保证最大偏移（GCLK 0xFF10）
//! 也落不进下一个实例的窗口。

use core::ops::Range;

use crate::error::{PeriphError, Result};
use crate::regs;

/// 外设类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralKind {
    Spi,
    Uart,
}

impl PeripheralKind {
    /// 寄存器映射占用的字节数（最大偏移 + 4）
    pub const fn register_span(self) -> usize {
        match self {
            PeripheralKind::Spi => regs::spi::REGISTER_SPAN,
            PeripheralKind::Uart => regs::uart::REGISTER_SPAN,
        }
    }

    /// 合法 stride 的下限
    pub const fn min_stride(self) -> usize {
        self.register_span().next_power_of_two()
    }

    pub const fn name(self) -> &'static str {
        match self {
            PeripheralKind::Spi => "SPI",
            PeripheralKind::Uart => "UART",
        }
    }
}

/// 拓扑描述，在初始化时显式传入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyConfig {
    pub kind: PeripheralKind,
    pub instance_count: usize,
    pub origin_address: usize,
    pub stride: usize,
}

/// 外设实例
///
/// 初始化时从拓扑构造一次，之后不可变、不可重定位。
/// 只能经 [`Topology::instance`] / [`Topology::instances`] 得到，
/// 所以持有它本身就证明了 index 合法。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeripheralInstance {
    index: usize,
    base_address: usize,
    stride: usize,
    kind: PeripheralKind,
}

impl PeripheralInstance {
    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn base_address(&self) -> usize {
        self.base_address
    }

    pub const fn kind(&self) -> PeripheralKind {
        self.kind
    }

    /// 寄存器的绝对地址
    #[inline]
    pub const fn reg(&self, offset: usize) -> usize {
        self.base_address + offset
    }

    /// 本实例独占的地址窗口
    pub const fn window(&self) -> Range<usize> {
        self.base_address..self.base_address + self.stride
    }

    pub fn contains(&self, addr: usize) -> bool {
        self.window().contains(&addr)
    }
}

/// 已校验的拓扑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    config: TopologyConfig,
}

impl Topology {
    /// 校验并创建拓扑
    ///
    /// 以下情况返回 `InvalidTopology`：
    /// - 实例数为 0
    /// - stride 不是 2 的幂，或小于 `kind.min_stride()`
    /// - origin 没有按 stride 对齐
    /// - 最后一个窗口越过地址空间末尾
    pub fn new(config: TopologyConfig) -> Result<Self> {
        let TopologyConfig {
            kind,
            instance_count,
            origin_address,
            stride,
        } = config;

        if instance_count == 0 {
            return Err(PeriphError::InvalidTopology);
        }
        if !stride.is_power_of_two() || stride < kind.min_stride() {
            return Err(PeriphError::InvalidTopology);
        }
        if origin_address % stride != 0 {
            return Err(PeriphError::InvalidTopology);
        }
        instance_count
            .checked_mul(stride)
            .and_then(|len| origin_address.checked_add(len))
            .ok_or(PeriphError::InvalidTopology)?;

        Ok(Self { config })
    }

    pub const fn kind(&self) -> PeripheralKind {
        self.config.kind
    }

    pub const fn len(&self) -> usize {
        self.config.instance_count
    }

    pub const fn is_empty(&self) -> bool {
        self.config.instance_count == 0
    }

    pub const fn stride(&self) -> usize {
        self.config.stride
    }

    pub const fn config(&self) -> &TopologyConfig {
        &self.config
    }

    /// 解析实例基地址
    ///
    /// # Panics
    ///
    /// `index >= instance_count` 是编程错误，直接 panic。
    /// 需要可恢复的检查时用 [`Topology::instance`]。
    pub fn resolve(&self, index: usize) -> usize {
        assert!(
            index < self.config.instance_count,
            "{} instance {} out of range (count {})",
            self.config.kind.name(),
            index,
            self.config.instance_count
        );
        self.config.origin_address + index * self.config.stride
    }

    /// 构造实例句柄
    pub fn instance(&self, index: usize) -> Result<PeripheralInstance> {
        if index >= self.config.instance_count {
            return Err(PeriphError::IndexOutOfRange {
                index,
                count: self.config.instance_count,
            });
        }
        Ok(PeripheralInstance {
            index,
            base_address: self.resolve(index),
            stride: self.config.stride,
            kind: self.config.kind,
        })
    }

    /// 按 index 顺序遍历全部实例
    pub fn instances(&self) -> impl Iterator<Item = PeripheralInstance> + '_ {
        (0..self.config.instance_count).map(move |index| PeripheralInstance {
            index,
            base_address: self.resolve(index),
            stride: self.config.stride,
            kind: self.config.kind,
        })
    }

    /// 地址落在哪个实例窗口里
    pub fn owner_of(&self, addr: usize) -> Option<usize> {
        let origin = self.config.origin_address;
        if addr < origin {
            return None;
        }
        let index = (addr - origin) / self.config.stride;
        (index < self.config.instance_count).then_some(index)
    }
}
