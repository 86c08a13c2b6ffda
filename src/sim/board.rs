//! # 仿真板级协作者
//!
//! 引脚路由、状态指示、时钟、退避的仿真实现，配合 [`SimBus`](super::SimBus)
//! 跑完整的上电流程。

use core::cell::Cell;

use crate::compat::Vec;
use crate::hal::gate::{Backoff, Clock};
use crate::hal::platform::{PinMode, PinRouting, StatusIndicator};

/// 仿真引脚路由
///
/// `configure_pin` 只暂存，`load_configs` 之后才算生效。
#[derive(Debug, Default)]
pub struct SimPins {
    pending: Vec<(u8, PinMode)>,
    committed: Vec<(u8, PinMode)>,
    loads: usize,
}

impl SimPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已生效的引脚配置
    pub fn committed(&self) -> &[(u8, PinMode)] {
        &self.committed
    }

    /// 生效的引脚模式
    pub fn mode_of(&self, pin: u8) -> Option<PinMode> {
        self.committed
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|&(_, mode)| mode)
    }

    /// 暂存但尚未提交的配置数
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl PinRouting for SimPins {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) {
        self.pending.push((pin, mode));
    }

    fn load_configs(&mut self) {
        self.committed.append(&mut self.pending);
        self.loads += 1;
    }
}

/// 仿真状态指示，记录每一次电平变化
#[derive(Debug, Default)]
pub struct SimIndicator {
    history: Vec<bool>,
}

impl SimIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }

    pub fn level(&self) -> Option<bool> {
        self.history.last().copied()
    }
}

impl StatusIndicator for SimIndicator {
    fn set(&mut self, high: bool) {
        self.history.push(high);
    }
}

/// 每次读取前进固定步长的时钟
#[derive(Debug)]
pub struct SteppingClock {
    now: Cell<u64>,
    step: u64,
}

impl SteppingClock {
    pub fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now_ticks(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// 只计数不等待的退避
#[derive(Debug, Default)]
pub struct CountingBackoff {
    pub relaxes: u32,
}

impl Backoff for CountingBackoff {
    fn relax(&mut self, _attempt: u32) {
        self.relaxes += 1;
    }
}
