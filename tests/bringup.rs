use neon_periph::config::{spi_pin_plan, uart_pin_plan, SPI_TOPOLOGY, UART_TOPOLOGY};
use neon_periph::drivers::{SpiConfig, SpiFleet, UartConfig, UartFleet};
use neon_periph::hal::{Bringup, PinMode, RegisterBus, Topology};
use neon_periph::log::{set_log_level, LogLevel};
use neon_periph::regs::spi::TXDATA as SPI_TXDATA;
use neon_periph::regs::uart::TXDATA as UART_TXDATA;
use neon_periph::sim::{Access, SimBus, SimIndicator, SimPins};
use serial_test::serial;

#[test]
#[serial]
fn test_full_bringup_spi() {
    set_log_level(LogLevel::Trace);

    let topology = Topology::new(SPI_TOPOLOGY).unwrap();
    let bus = SimBus::new();
    bus.map_topology(&topology);

    let mut routing = Bringup::new(SimPins::new(), &bus, SimIndicator::new());
    for instance in topology.instances() {
        let plan = spi_pin_plan(instance.index()).unwrap();
        routing = routing.route_plan(&plan);
    }
    let mut armed = routing.commit().arm();
    assert!(bus.is_armed());

    let mut fleet = SpiFleet::configure(armed.bus(&bus), &topology, SpiConfig::default()).unwrap();
    armed.signal_ready();
    for (i, spi) in fleet.iter_mut().enumerate() {
        spi.transact(0xA0 + i as u8);
    }

    let (pins, indicator) = armed.into_parts();
    assert_eq!(indicator.history(), [false, true]);
    assert_eq!(pins.loads(), 1);
    assert_eq!(pins.committed().len(), 20);
    assert_eq!(pins.mode_of(17), Some(PinMode::InputPullUp));
    assert_eq!(pins.mode_of(36), Some(PinMode::Output));

    for instance in topology.instances() {
        assert_eq!(
            bus.writes_to(instance.reg(SPI_TXDATA)),
            [0xA0 + instance.index() as u32]
        );
    }
    assert_eq!(bus.stray_accesses(), 0);

    set_log_level(LogLevel::Info);
}

#[test]
#[serial]
fn test_full_bringup_uart() {
    let topology = Topology::new(UART_TOPOLOGY).unwrap();
    let bus = SimBus::new();

    let mut routing = Bringup::new(SimPins::new(), &bus, SimIndicator::new());
    for instance in topology.instances() {
        routing = routing.route_plan(&uart_pin_plan(instance.index()).unwrap());
    }
    let mut armed = routing.commit().arm();

    let mut fleet = UartFleet::configure(armed.bus(&bus), &topology, UartConfig::default()).unwrap();
    armed.signal_ready();
    fleet.get_mut(0).unwrap().transact(b"Hello\n");

    let (pins, _) = armed.into_parts();
    // 第 8 号引脚不参与路由
    assert_eq!(pins.mode_of(8), None);
    assert_eq!(pins.mode_of(16), Some(PinMode::Output));
    assert_eq!(pins.mode_of(15), Some(PinMode::InputPullUp));
    assert_eq!(bus.writes_to(topology.resolve(0) + UART_TXDATA).len(), 6);
}

#[test]
fn test_accesses_before_arming_get_no_answer() {
    let topology = Topology::new(SPI_TOPOLOGY).unwrap();
    let bus = SimBus::new();
    let addr = topology.resolve(0) + SPI_TXDATA;

    bus.write32(addr, 0xA0);
    assert_eq!(bus.read32(addr), 0);
    assert_eq!(bus.peek(addr), 0);
    assert_eq!(
        bus.take_log(),
        [
            Access::Dropped { addr, write: true },
            Access::Dropped { addr, write: false },
        ]
    );

    let routing = Bringup::new(SimPins::new(), &bus, SimIndicator::new());
    let armed = routing.commit().arm();
    let _ = armed.bus(&bus);
    bus.write32(addr, 0xA0);
    assert_eq!(bus.log(), [Access::Write { addr, value: 0xA0 }]);
}
