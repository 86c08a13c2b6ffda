//! # 控制器公共定义
//!
//! SPI 与 UART 控制器共享的 trait、类型状态标记和事务状态机。
//!
//! ## 配置类型状态
//!
//! ```text
//! Controller<Unconfigured> ──configure()──► Controller<Configured>
//!                                              │  ▲
//!                                              └──┘ reconfigure()（幂等）
//! ```
//!
//! 事务方法只在 `Configured` 上存在，“未配置就发数据”无法编译。
//!
//! ## 事务状态机
//!
//! ```text
//! SPI:  Idle → CsAsserted → Enabled → DataIssued → AwaitingCompletion
//!                                         ▲               │
//!                                         └───(下一字节)──┤
//!                                                         ▼
//!       Idle ◄── CsDeasserted ◄── Disabled ◄──────────────┘
//!
//! UART: Idle → Enabled → DataIssued ⟲ → Idle
//! ```

use crate::hal::topology::{PeripheralInstance, PeripheralKind};

// ============================================================================
// 配置状态标记
// ============================================================================

/// 配置状态标记 trait
pub trait ConfigState: private::Sealed {}

/// 尚未写入静态配置
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured;

/// 静态配置已完整写入
#[derive(Debug, Clone, Copy)]
pub struct Configured;

impl ConfigState for Unconfigured {}
impl ConfigState for Configured {}

// 私有模块用于封闭 trait
mod private {
    pub trait Sealed {}
    impl Sealed for super::Unconfigured {}
    impl Sealed for super::Configured {}
}

// ============================================================================
// 事务状态
// ============================================================================

/// 单次事务的瞬时状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    /// 仅 SPI
    CsAsserted,
    Enabled,
    DataIssued,
    /// 仅 SPI，在完成门里
    AwaitingCompletion,
    /// 仅 SPI
    Disabled,
    /// 仅 SPI
    CsDeasserted,
}

impl TransactionState {
    /// `self -> to` 对该外设类型是否合法
    pub fn can_advance(self, to: Self, kind: PeripheralKind) -> bool {
        use TransactionState::*;
        match kind {
            PeripheralKind::Spi => matches!(
                (self, to),
                (Idle, CsAsserted)
                    | (CsAsserted, Enabled)
                    | (Enabled, DataIssued)
                    | (DataIssued, AwaitingCompletion)
                    | (AwaitingCompletion, DataIssued)
                    | (AwaitingCompletion, Disabled)
                    | (Disabled, CsDeasserted)
                    | (CsDeasserted, Idle)
            ),
            PeripheralKind::Uart => matches!(
                (self, to),
                (Idle, Enabled)
                    | (Enabled, DataIssued)
                    | (DataIssued, DataIssued)
                    | (DataIssued, Idle)
                    | (Enabled, Idle)
            ),
        }
    }

    /// 推进状态，非法转换是调试断言
    #[inline]
    pub fn advance(&mut self, to: Self, kind: PeripheralKind) {
        debug_assert!(
            self.can_advance(to, kind),
            "illegal {} transition {:?} -> {:?}",
            kind.name(),
            self,
            to
        );
        *self = to;
    }

    /// SPI 片选在此状态下是否应当有效
    pub fn cs_active(self) -> bool {
        use TransactionState::*;
        matches!(
            self,
            CsAsserted | Enabled | DataIssued | AwaitingCompletion | Disabled
        )
    }
}

// ============================================================================
// 控制器 Trait
// ============================================================================

/// 控制器基础 trait
///
/// [`Fleet`](crate::drivers::Fleet) 通过它按实例号管理一组控制器。
pub trait Controller {
    /// 控制的外设实例
    fn instance(&self) -> PeripheralInstance;

    /// 外设类型名称，用于日志
    fn name(&self) -> &'static str {
        self.instance().kind().name()
    }

    /// 当前事务状态，事务之间总是 `Idle`
    fn state(&self) -> TransactionState;
}

/// SPI 模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// (CPOL, CPHA)
    pub const fn polarity_phase(self) -> (bool, bool) {
        match self {
            SpiMode::Mode0 => (false, false),
            SpiMode::Mode1 => (false, true),
            SpiMode::Mode2 => (true, false),
            SpiMode::Mode3 => (true, true),
        }
    }
}

// ============================================================================
// 单元测试
// ============================================================================
