//! # 仿真总线
//!
//! [`SimBus`] 用稀疏寄存器表模拟共享总线，按顺序记录每一次访问。
//!
//! ## 功能特性
//!
//! - 实现 [`RegisterBus`]，驱动无需修改即可在仿真总线上运行
//! - 接口门：`enable_interface` 之前的写被丢弃、读返回 0，并记为 [`Access::Dropped`]
//! - 脚本化读取：为某个地址预设一串读取值，用来模拟 BUSY 位、FIFO 排空
//! - 窗口登记：访问落在所有已登记窗口之外时计为越界访问
//!
//! ## 使用示例
//!
//! ```rust
//! use neon_periph::hal::RegisterBus;
//! use neon_periph::sim::{Access, SimBus};
//!
//! let bus = SimBus::armed();
//! bus.script_reads(0x14, &[1, 1, 0]);
//! bus.write32(0x04, 0xA0);
//! assert_eq!(bus.read32(0x14), 1);
//! assert_eq!(bus.log()[0], Access::Write { addr: 0x04, value: 0xA0 });
//! ```

use core::ops::Range;

use spin::Mutex as SpinMutex;

use crate::compat::{BTreeMap, Vec, VecDeque};
use crate::hal::bus::RegisterBus;
use crate::hal::platform::BusInterface;
use crate::hal::topology::Topology;

/// 一次总线访问
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read { addr: usize, value: u32 },
    Write { addr: usize, value: u32 },
    /// 接口门未打开，访问没有被应答
    Dropped { addr: usize, write: bool },
}

impl Access {
    pub fn addr(&self) -> usize {
        match *self {
            Access::Read { addr, .. } | Access::Write { addr, .. } | Access::Dropped { addr, .. } => {
                addr
            }
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Access::Write { .. })
    }
}

#[derive(Default)]
struct State {
    regs: BTreeMap<usize, u32>,
    scripted: BTreeMap<usize, VecDeque<u32>>,
    log: Vec<Access>,
    windows: Vec<Range<usize>>,
    stray: usize,
    armed: bool,
}

impl State {
    fn note_window(&mut self, addr: usize) {
        if !self.windows.is_empty() && !self.windows.iter().any(|w| w.contains(&addr)) {
            self.stray += 1;
        }
    }
}

/// 仿真总线
pub struct SimBus {
    state: SpinMutex<State>,
}

impl SimBus {
    /// 接口门关闭的总线
    pub fn new() -> Self {
        Self {
            state: SpinMutex::new(State::default()),
        }
    }

    /// 接口门已打开的总线
    pub fn armed() -> Self {
        let bus = Self::new();
        bus.state.lock().armed = true;
        bus
    }

    pub fn is_armed(&self) -> bool {
        self.state.lock().armed
    }

    /// 登记一个合法窗口
    pub fn map_window(&self, window: Range<usize>) {
        self.state.lock().windows.push(window);
    }

    /// 登记拓扑中所有实例的窗口
    pub fn map_topology(&self, topology: &Topology) {
        for instance in topology.instances() {
            self.map_window(instance.window());
        }
    }

    /// 落在已登记窗口之外的访问次数
    pub fn stray_accesses(&self) -> usize {
        self.state.lock().stray
    }

    /// 预设 `addr` 接下来的读取值，用完后回落到寄存器存储值
    pub fn script_reads(&self, addr: usize, values: &[u32]) {
        self.state
            .lock()
            .scripted
            .entry(addr)
            .or_default()
            .extend(values.iter().copied());
    }

    /// 读寄存器存储值，不记录、不消耗脚本
    pub fn peek(&self, addr: usize) -> u32 {
        self.state.lock().regs.get(&addr).copied().unwrap_or(0)
    }

    /// 写寄存器存储值，不记录
    pub fn poke(&self, addr: usize, value: u32) {
        self.state.lock().regs.insert(addr, value);
    }

    /// 访问记录的副本
    pub fn log(&self) -> Vec<Access> {
        self.state.lock().log.clone()
    }

    /// 取走访问记录
    pub fn take_log(&self) -> Vec<Access> {
        core::mem::take(&mut self.state.lock().log)
    }

    /// 写到 `addr` 的所有值，按顺序
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.state
            .lock()
            .log
            .iter()
            .filter_map(|a| match *a {
                Access::Write { addr: a, value } if a == addr => Some(value),
                _ => None,
            })
            .collect()
    }

    /// 寄存器存储的快照
    pub fn snapshot(&self) -> BTreeMap<usize, u32> {
        self.state.lock().regs.clone()
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimBus {
    fn read32(&self, addr: usize) -> u32 {
        let mut state = self.state.lock();
        if !state.armed {
            state.log.push(Access::Dropped { addr, write: false });
            return 0;
        }
        state.note_window(addr);

        let scripted = state.scripted.get_mut(&addr).and_then(|q| q.pop_front());
        let value = scripted.unwrap_or_else(|| state.regs.get(&addr).copied().unwrap_or(0));
        state.log.push(Access::Read { addr, value });
        value
    }

    fn write32(&self, addr: usize, value: u32) {
        let mut state = self.state.lock();
        if !state.armed {
            state.log.push(Access::Dropped { addr, write: true });
            return;
        }
        state.note_window(addr);

        state.regs.insert(addr, value);
        state.log.push(Access::Write { addr, value });
    }
}

impl BusInterface for &SimBus {
    fn enable_interface(&mut self) {
        self.state.lock().armed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_accesses_are_dropped() {
        let bus = SimBus::new();
        bus.write32(0x10, 5);
        assert_eq!(bus.read32(0x10), 0);
        assert_eq!(
            bus.log(),
            [
                Access::Dropped { addr: 0x10, write: true },
                Access::Dropped { addr: 0x10, write: false },
            ]
        );

        let mut iface = &bus;
        iface.enable_interface();
        bus.write32(0x10, 5);
        assert_eq!(bus.read32(0x10), 5);
    }

    #[test]
    fn test_scripted_reads_fall_back_to_storage() {
        let bus = SimBus::armed();
        bus.poke(0x14, 0x40);
        bus.script_reads(0x14, &[1, 2]);
        assert_eq!(bus.read32(0x14), 1);
        assert_eq!(bus.read32(0x14), 2);
        assert_eq!(bus.read32(0x14), 0x40);
    }

    #[test]
    fn test_stray_accesses_counted() {
        let bus = SimBus::armed();
        bus.map_window(0x1000..0x2000);
        bus.write32(0x1004, 1);
        assert_eq!(bus.stray_accesses(), 0);
        bus.write32(0x2000, 1);
        bus.read32(0x0FFC);
        assert_eq!(bus.stray_accesses(), 2);
    }

    #[test]
    fn test_writes_to_and_take_log() {
        let bus = SimBus::armed();
        bus.write32(4, 1);
        bus.write32(8, 2);
        bus.write32(4, 3);
        assert_eq!(bus.writes_to(4), [1, 3]);
        assert_eq!(bus.take_log().len(), 3);
        assert!(bus.log().is_empty());
    }
}
