//! # SPI 主机驱动
//!
//! 单字节事务的寄存器顺序固定不变：
//!
//! ```text
//! CTRL.SS=1 → CTRL.ENABLE=1 → TXDATA ← byte → 轮询 STATUS.BUSY==0 → CTRL.ENABLE=0 → CTRL.SS=0
//! ```
//!
//! 片选只在引擎使能期间有效；忙位清零前关引擎或撤片选会截断传输，
//! 所以这些步骤任何情况下都不重排。
//!
//! ## 使用示例
//!
//! ```rust
//! use neon_periph::config::SPI_TOPOLOGY;
//! use neon_periph::drivers::{SpiConfig, SpiController};
//! use neon_periph::hal::{ArmedBus, Topology};
//! use neon_periph::sim::SimBus;
//!
//! let bus = SimBus::armed();
//! let topology = Topology::new(SPI_TOPOLOGY).unwrap();
//! let spi0 = SpiController::new(ArmedBus::assume_armed(&bus), topology.instance(0).unwrap()).unwrap();
//!
//! let mut spi0 = spi0.configure(SpiConfig::default()).unwrap();
//! spi0.transact(0xA0);
//! ```

use core::marker::PhantomData;

use crate::config::SPI_DEFAULT_PRESCALER;
use crate::drivers::fleet::Fleet;
use crate::drivers::traits::{
    ConfigState, Configured, Controller, SpiMode, TransactionState, Unconfigured,
};
use crate::error::{PeriphError, Result};
use crate::hal::bus::RegisterBus;
use crate::hal::gate::{Backoff, Poller};
use crate::hal::platform::ArmedBus;
use crate::hal::topology::{PeripheralInstance, PeripheralKind, Topology};
use crate::regs::spi::{Cfg, Ctrl, SpiRegs, Status};
use crate::regs::{GCLK_ENABLE, PRESCALER_MAX};

/// SPI 静态配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// 时钟门控
    pub clock_enabled: bool,
    /// CPOL
    pub polarity: bool,
    /// CPHA
    pub phase: bool,
    /// 预分频，16 位
    pub prescaler: u32,
}

impl SpiConfig {
    /// 按 SPI 模式生成配置，其余字段取默认值
    pub const fn from_mode(mode: SpiMode) -> Self {
        let (polarity, phase) = mode.polarity_phase();
        Self {
            clock_enabled: true,
            polarity,
            phase,
            prescaler: SPI_DEFAULT_PRESCALER,
        }
    }

    pub const fn with_prescaler(mut self, prescaler: u32) -> Self {
        self.prescaler = prescaler;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.prescaler > PRESCALER_MAX {
            return Err(PeriphError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::from_mode(SpiMode::Mode0)
    }
}

/// SPI 控制器
///
/// `S` 是配置类型状态，事务方法只在 [`Configured`] 上提供。
pub struct SpiController<'a, B: RegisterBus + ?Sized, S: ConfigState = Configured> {
    bus: ArmedBus<'a, B>,
    instance: PeripheralInstance,
    config: SpiConfig,
    state: TransactionState,
    _config_state: PhantomData<S>,
}

impl<'a, B: RegisterBus + ?Sized, S: ConfigState> SpiController<'a, B, S> {
    #[inline]
    fn regs(&self) -> SpiRegs<'a, B> {
        SpiRegs::new(self.bus.get(), self.instance.base_address())
    }

    /// 写入静态配置
    ///
    /// 顺序：GCLK → CPOL → CPHA → PR。CPOL/CPHA 各自读改写，互不覆盖。
    fn apply(&self, config: &SpiConfig) {
        let regs = self.regs();
        regs.write_gclk(if config.clock_enabled { GCLK_ENABLE } else { 0 });
        regs.modify_cfg(|v| Cfg::from_raw(v).with_cpol(config.polarity).raw());
        regs.modify_cfg(|v| Cfg::from_raw(v).with_cpha(config.phase).raw());
        regs.write_pr(config.prescaler);
        crate::debug!(
            "spi{}: configured gclk={} cpol={} cpha={} pr={:#x}",
            self.instance.index(),
            config.clock_enabled,
            config.polarity,
            config.phase,
            config.prescaler
        );
    }
}

impl<'a, B: RegisterBus + ?Sized> SpiController<'a, B, Unconfigured> {
    /// 为一个 SPI 实例创建控制器
    pub fn new(bus: ArmedBus<'a, B>, instance: PeripheralInstance) -> Result<Self> {
        if instance.kind() != PeripheralKind::Spi {
            return Err(PeriphError::KindMismatch);
        }
        Ok(Self {
            bus,
            instance,
            config: SpiConfig::default(),
            state: TransactionState::Idle,
            _config_state: PhantomData,
        })
    }

    /// 写入静态配置（Unconfigured -> Configured）
    ///
    /// 配置值越界时不写任何寄存器，直接返回 `InvalidConfig`。
    pub fn configure(self, config: SpiConfig) -> Result<SpiController<'a, B, Configured>> {
        config.validate()?;
        self.apply(&config);
        Ok(SpiController {
            bus: self.bus,
            instance: self.instance,
            config,
            state: TransactionState::Idle,
            _config_state: PhantomData,
        })
    }
}

impl<'a, B: RegisterBus + ?Sized> SpiController<'a, B, Configured> {
    /// 重新写入配置，相同配置重复写入没有可观察的差别
    pub fn reconfigure(&mut self, config: SpiConfig) -> Result<()> {
        config.validate()?;
        self.apply(&config);
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// 发送一个字节，阻塞直到忙位清零
    ///
    /// 没有超时：忙位永不清零时调用者会一直挂住。
    /// 需要超时请用 [`transact_with`](Self::transact_with)。
    pub fn transact(&mut self, byte: u8) {
        // Forever 策略没有超时分支
        let _ = self.transact_with(byte, &mut Poller::forever());
    }

    /// 用指定的轮询器发送一个字节，返回完成门的读取次数
    pub fn transact_with<K: Backoff>(&mut self, byte: u8, poller: &mut Poller<'_, K>) -> Result<u32> {
        self.write_frame_with(core::slice::from_ref(&byte), poller)
    }

    /// 在一次片选窗口内连续发送多个字节
    pub fn write_frame(&mut self, bytes: &[u8]) {
        let _ = self.write_frame_with(bytes, &mut Poller::forever());
    }

    /// 用指定的轮询器发送一帧
    ///
    /// 每个字节之后都过一次完成门。超时时仍然先关引擎、撤片选，
    /// 再返回 `TimedOut`，控制器回到 `Idle`。
    pub fn write_frame_with<K: Backoff>(
        &mut self,
        bytes: &[u8],
        poller: &mut Poller<'_, K>,
    ) -> Result<u32> {
        if bytes.is_empty() {
            return Ok(0);
        }
        let regs = self.regs();

        self.step(TransactionState::CsAsserted);
        regs.modify_ctrl(|v| Ctrl::from_raw(v).with_ss(true).raw());

        self.step(TransactionState::Enabled);
        regs.modify_ctrl(|v| Ctrl::from_raw(v).with_enable(true).raw());

        let mut outcome = Ok(0u32);
        for &byte in bytes {
            self.step(TransactionState::DataIssued);
            regs.write_txdata(u32::from(byte));

            self.step(TransactionState::AwaitingCompletion);
            match poller.await_clear(self.bus.get(), regs.status_addr(), Status::BUSY_MASK) {
                Ok(polls) => outcome = outcome.map(|total| total.saturating_add(polls)),
                Err(e) => {
                    crate::warn!("spi{}: byte {:#04x} never completed", self.instance.index(), byte);
                    outcome = Err(e);
                    break;
                }
            }
        }

        self.step(TransactionState::Disabled);
        regs.modify_ctrl(|v| Ctrl::from_raw(v).with_enable(false).raw());

        self.step(TransactionState::CsDeasserted);
        regs.modify_ctrl(|v| Ctrl::from_raw(v).with_ss(false).raw());

        self.step(TransactionState::Idle);
        outcome
    }

    /// 完成门：轮询 STATUS.BUSY 直到清零
    pub fn await_not_busy<K: Backoff>(&self, poller: &mut Poller<'_, K>) -> Result<u32> {
        let regs = self.regs();
        poller.await_clear(self.bus.get(), regs.status_addr(), Status::BUSY_MASK)
    }

    /// 单次读取 BUSY 位
    pub fn is_busy(&self) -> bool {
        Status::from_raw(self.regs().status()).busy()
    }

    /// 最近收到的字节
    pub fn received(&self) -> u8 {
        (self.regs().rxdata() & 0xFF) as u8
    }

    fn step(&mut self, to: TransactionState) {
        self.state.advance(to, PeripheralKind::Spi);
        crate::trace!("spi{}: {:?}", self.instance.index(), to);
    }
}

impl<B: RegisterBus + ?Sized, S: ConfigState> Controller for SpiController<'_, B, S> {
    fn instance(&self) -> PeripheralInstance {
        self.instance
    }

    fn state(&self) -> TransactionState {
        self.state
    }
}

/// 一组已配置的 SPI 控制器
pub type SpiFleet<'a, B> = Fleet<SpiController<'a, B, Configured>>;

impl<'a, B: RegisterBus + ?Sized> Fleet<SpiController<'a, B, Configured>> {
    /// 按 index 顺序用同一份配置配置拓扑中的每个实例
    pub fn configure(bus: ArmedBus<'a, B>, topology: &Topology, config: SpiConfig) -> Result<Self> {
        Self::configure_each(bus, topology, |_| config)
    }

    /// 按 index 顺序逐个配置，配置由 `config_for` 给出
    pub fn configure_each<F>(bus: ArmedBus<'a, B>, topology: &Topology, mut config_for: F) -> Result<Self>
    where
        F: FnMut(PeripheralInstance) -> SpiConfig,
    {
        let mut fleet = Fleet::with_capacity(topology.len());
        for instance in topology.instances() {
            let controller = SpiController::new(bus, instance)?.configure(config_for(instance))?;
            fleet.push(controller);
        }
        Ok(fleet)
    }
}

// ============================================================================
// 单元测试
// ============================================================================
