//! # UART 发送驱动
//!
//! 配置顺序：
//!
//! ```text
//! CTRL.EN → GCLK → [PR] → TX_FIFO_THRESHOLD → CTRL.{TXEN,RXEN}
//! ```
//!
//! 发送时每个字符写一次 TXDATA，由硬件 FIFO 排队移出。
//! [`transact`](UartController::transact) 不等待发送完成；
//! 需要确认线路空闲时调用 [`flush`](UartController::flush)，它轮询
//! TX_FIFO_LEVEL 直到为 0。
//!
//! ## 使用示例
//!
//! ```rust
//! use neon_periph::config::UART_TOPOLOGY;
//! use neon_periph::drivers::{UartConfig, UartController};
//! use neon_periph::hal::{ArmedBus, Topology};
//! use neon_periph::sim::SimBus;
//!
//! let bus = SimBus::armed();
//! let topology = Topology::new(UART_TOPOLOGY).unwrap();
//! let uart0 = UartController::new(ArmedBus::assume_armed(&bus), topology.instance(0).unwrap()).unwrap();
//!
//! let mut uart0 = uart0.configure(UartConfig::default()).unwrap();
//! uart0.transact(b"Hello\n");
//! assert_eq!(bus.writes_to(0x3000_0004), [b'H', b'e', b'l', b'l', b'o', b'\n'].map(u32::from));
//! ```

use core::fmt;
use core::marker::PhantomData;

use crate::config::{UART_DEFAULT_TX_THRESHOLD, UART_TX_FIFO_DEPTH};
use crate::drivers::fleet::Fleet;
use crate::drivers::traits::{ConfigState, Configured, Controller, TransactionState, Unconfigured};
use crate::error::{PeriphError, Result};
use crate::hal::bus::RegisterBus;
use crate::hal::gate::{Backoff, Poller};
use crate::hal::platform::ArmedBus;
use crate::hal::topology::{PeripheralInstance, PeripheralKind, Topology};
use crate::regs::uart::{Ctrl, UartRegs};
use crate::regs::{FIFO_LEVEL_MASK, FIFO_THRESHOLD_MAX, GCLK_ENABLE, PRESCALER_MAX};

/// UART 静态配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    pub clock_enabled: bool,
    /// 发送 FIFO 阈值，4 位
    pub tx_fifo_threshold: u32,
    pub tx_enabled: bool,
    pub rx_enabled: bool,
    /// `None` 时不写 PR，保留复位值
    pub prescaler: Option<u32>,
}

impl UartConfig {
    pub const fn with_prescaler(mut self, prescaler: u32) -> Self {
        self.prescaler = Some(prescaler);
        self
    }

    pub const fn with_tx_fifo_threshold(mut self, threshold: u32) -> Self {
        self.tx_fifo_threshold = threshold;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.tx_fifo_threshold > FIFO_THRESHOLD_MAX {
            return Err(PeriphError::InvalidConfig);
        }
        if self.prescaler.is_some_and(|pr| pr > PRESCALER_MAX) {
            return Err(PeriphError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            clock_enabled: true,
            tx_fifo_threshold: UART_DEFAULT_TX_THRESHOLD,
            tx_enabled: true,
            rx_enabled: false,
            prescaler: None,
        }
    }
}

/// UART 控制器
pub struct UartController<'a, B: RegisterBus + ?Sized, S: ConfigState = Configured> {
    bus: ArmedBus<'a, B>,
    instance: PeripheralInstance,
    config: UartConfig,
    state: TransactionState,
    _config_state: PhantomData<S>,
}

impl<'a, B: RegisterBus + ?Sized, S: ConfigState> UartController<'a, B, S> {
    #[inline]
    fn regs(&self) -> UartRegs<'a, B> {
        UartRegs::new(self.bus.get(), self.instance.base_address())
    }

    fn apply(&self, config: &UartConfig) {
        let regs = self.regs();
        regs.modify_ctrl(|v| Ctrl::from_raw(v).with_en(true).raw());
        regs.write_gclk(if config.clock_enabled { GCLK_ENABLE } else { 0 });
        if let Some(pr) = config.prescaler {
            regs.write_pr(pr);
        }
        regs.write_tx_fifo_threshold(config.tx_fifo_threshold);
        // 两个方向都显式写入，关闭也要落到寄存器上
        regs.modify_ctrl(|v| {
            Ctrl::from_raw(v)
                .with_txen(config.tx_enabled)
                .with_rxen(config.rx_enabled)
                .raw()
        });
        crate::debug!(
            "uart{}: configured gclk={} threshold={} tx={} rx={}",
            self.instance.index(),
            config.clock_enabled,
            config.tx_fifo_threshold,
            config.tx_enabled,
            config.rx_enabled
        );
    }
}

impl<'a, B: RegisterBus + ?Sized> UartController<'a, B, Unconfigured> {
    /// 为一个 UART 实例创建控制器
    pub fn new(bus: ArmedBus<'a, B>, instance: PeripheralInstance) -> Result<Self> {
        if instance.kind() != PeripheralKind::Uart {
            return Err(PeriphError::KindMismatch);
        }
        Ok(Self {
            bus,
            instance,
            config: UartConfig::default(),
            state: TransactionState::Idle,
            _config_state: PhantomData,
        })
    }

    /// 写入静态配置（Unconfigured -> Configured）
    pub fn configure(self, config: UartConfig) -> Result<UartController<'a, B, Configured>> {
        config.validate()?;
        self.apply(&config);
        Ok(UartController {
            bus: self.bus,
            instance: self.instance,
            config,
            state: TransactionState::Idle,
            _config_state: PhantomData,
        })
    }
}

impl<'a, B: RegisterBus + ?Sized> UartController<'a, B, Configured> {
    pub fn reconfigure(&mut self, config: UartConfig) -> Result<()> {
        config.validate()?;
        self.apply(&config);
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    /// 按顺序把每个字节写入 TXDATA
    ///
    /// 不检查 FIFO 余量，超过 FIFO 深度的部分由硬件决定是否丢弃。
    pub fn transact(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let regs = self.regs();
        self.step(TransactionState::Enabled);
        for &byte in bytes {
            self.step(TransactionState::DataIssued);
            regs.write_txdata(u32::from(byte));
        }
        self.step(TransactionState::Idle);
    }

    /// 每个字节前先等 FIFO 有空位，返回累计轮询次数
    ///
    /// 超时时已写出的字节不回退，控制器回到 `Idle`。
    pub fn transact_paced_with<K: Backoff>(
        &mut self,
        bytes: &[u8],
        poller: &mut Poller<'_, K>,
    ) -> Result<u32> {
        if bytes.is_empty() {
            return Ok(0);
        }
        let regs = self.regs();
        self.step(TransactionState::Enabled);

        let mut total = 0u32;
        for &byte in bytes {
            let waited = poller.poll_until(|| {
                (regs.tx_fifo_level() & FIFO_LEVEL_MASK) < UART_TX_FIFO_DEPTH as u32
            });
            match waited {
                Ok(polls) => total = total.saturating_add(polls),
                Err(e) => {
                    crate::warn!("uart{}: tx fifo stayed full", self.instance.index());
                    self.step(TransactionState::Idle);
                    return Err(e);
                }
            }
            self.step(TransactionState::DataIssued);
            regs.write_txdata(u32::from(byte));
        }

        self.step(TransactionState::Idle);
        Ok(total)
    }

    /// 发送 FIFO 中尚未移出的字符数
    pub fn tx_fifo_level(&self) -> u32 {
        self.regs().tx_fifo_level() & FIFO_LEVEL_MASK
    }

    /// 单次读取：发送 FIFO 是否已排空
    pub fn transmit_complete(&self) -> bool {
        self.tx_fifo_level() == 0
    }

    /// 阻塞直到发送 FIFO 排空
    pub fn flush(&self) {
        let _ = self.flush_with(&mut Poller::forever());
    }

    pub fn flush_with<K: Backoff>(&self, poller: &mut Poller<'_, K>) -> Result<u32> {
        let regs = self.regs();
        poller.await_value(self.bus.get(), regs.tx_fifo_level_addr(), FIFO_LEVEL_MASK, 0)
    }

    fn step(&mut self, to: TransactionState) {
        self.state.advance(to, PeripheralKind::Uart);
        crate::trace!("uart{}: {:?}", self.instance.index(), to);
    }
}

impl<B: RegisterBus + ?Sized> fmt::Write for UartController<'_, B, Configured> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.transact(s.as_bytes());
        Ok(())
    }
}

impl<B: RegisterBus + ?Sized, S: ConfigState> Controller for UartController<'_, B, S> {
    fn instance(&self) -> PeripheralInstance {
        self.instance
    }

    fn state(&self) -> TransactionState {
        self.state
    }
}

/// 一组已配置的 UART 控制器
pub type UartFleet<'a, B> = Fleet<UartController<'a, B, Configured>>;

impl<'a, B: RegisterBus + ?Sized> Fleet<UartController<'a, B, Configured>> {
    /// 按 index 顺序用同一份配置配置拓扑中的每个实例
    pub fn configure(bus: ArmedBus<'a, B>, topology: &Topology, config: UartConfig) -> Result<Self> {
        Self::configure_each(bus, topology, |_| config)
    }

    pub fn configure_each<F>(bus: ArmedBus<'a, B>, topology: &Topology, mut config_for: F) -> Result<Self>
    where
        F: FnMut(PeripheralInstance) -> UartConfig,
    {
        let mut fleet = Fleet::with_capacity(topology.len());
        for instance in topology.instances() {
            let controller = UartController::new(bus, instance)?.configure(config_for(instance))?;
            fleet.push(controller);
        }
        Ok(fleet)
    }
}
