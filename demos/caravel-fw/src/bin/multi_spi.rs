//! 五个 SPI 主机依次发送 0xA0..=0xA4
//!
//! ```bash
//! cargo build --release --bin multi_spi
//! ```

#![no_std]
#![no_main]

use caravel_fw::{park, MgmtGpio, UserInterface, UserPads};
use neon_periph::config::{spi_pin_plan, SPI_TOPOLOGY};
use neon_periph::drivers::{SpiConfig, SpiFleet};
use neon_periph::hal::{Bringup, Mmio, Topology};
use neon_periph::mem;
use riscv_rt::entry;

#[entry]
fn main() -> ! {
    mem::init_heap();
    // Safety: 只访问 housekeeping、CSR 和用户工程窗口
    let bus = unsafe { Mmio::new() };
    let Ok(topology) = Topology::new(SPI_TOPOLOGY) else { park() };

    let mut routing = Bringup::new(UserPads::new(&bus), UserInterface::new(&bus), MgmtGpio::new(&bus));
    for instance in topology.instances() {
        if let Some(plan) = spi_pin_plan(instance.index()) {
            routing = routing.route_plan(&plan);
        }
    }
    let mut armed = routing.commit().arm();

    let Ok(mut spis) = SpiFleet::configure(armed.bus(&bus), &topology, SpiConfig::default()) else {
        park()
    };
    armed.signal_ready();
    for (i, spi) in spis.iter_mut().enumerate() {
        spi.transact(0xA0 + i as u8);
    }

    park()
}
