use core::fmt::Write;

use neon_periph::config::{UART_TOPOLOGY, UART_TX_FIFO_DEPTH};
use neon_periph::drivers::{UartConfig, UartController, UartFleet};
use neon_periph::hal::{ArmedBus, Poller, Topology, WaitPolicy};
use neon_periph::regs::uart::{Ctrl, CTRL, GCLK, TXDATA, TX_FIFO_LEVEL, TX_FIFO_THRESHOLD};
use neon_periph::sim::{Access, CountingBackoff, SimBus, SteppingClock};
use neon_periph::PeriphError;

const MESSAGES: [&[u8]; 8] = [
    b"Hello\n", b"World\n", b"Test2\n", b"Test3\n", b"Test4\n", b"Test5\n", b"Test6\n", b"Test7\n",
];

fn as_words(bytes: &[u8]) -> Vec<u32> {
    bytes.iter().copied().map(u32::from).collect()
}

#[test]
fn test_eight_instances_eight_messages() {
    let topology = Topology::new(UART_TOPOLOGY).unwrap();
    let bus = SimBus::armed();
    bus.map_topology(&topology);

    let mut fleet =
        UartFleet::configure(ArmedBus::assume_armed(&bus), &topology, UartConfig::default()).unwrap();
    for (uart, msg) in fleet.iter_mut().zip(MESSAGES) {
        uart.transact(msg);
    }

    for (instance, msg) in topology.instances().zip(MESSAGES) {
        assert_eq!(bus.writes_to(instance.reg(TXDATA)), as_words(msg));
        assert_eq!(bus.peek(instance.reg(TX_FIFO_THRESHOLD)), 3);
        assert_eq!(bus.peek(instance.reg(GCLK)), 1);
        assert_eq!(bus.peek(instance.reg(CTRL)), Ctrl::EN_MASK | Ctrl::TXEN_MASK);
    }
    assert_eq!(bus.stray_accesses(), 0);
}

#[test]
fn test_hello_is_six_ordered_writes() {
    let topology = Topology::new(UART_TOPOLOGY).unwrap();
    let bus = SimBus::armed();
    let mut uart = UartController::new(ArmedBus::assume_armed(&bus), topology.instance(0).unwrap())
        .unwrap()
        .configure(UartConfig::default())
        .unwrap();
    bus.take_log();

    uart.transact(b"Hello\n");

    let txdata = topology.resolve(0) + TXDATA;
    let expected: Vec<Access> = b"Hello\n"
        .iter()
        .map(|&c| Access::Write { addr: txdata, value: u32::from(c) })
        .collect();
    assert_eq!(bus.log(), expected);
}

#[test]
fn test_full_fifo_sequence_in_order() {
    let topology = Topology::new(UART_TOPOLOGY).unwrap();
    let bus = SimBus::armed();
    let mut uart = UartController::new(ArmedBus::assume_armed(&bus), topology.instance(2).unwrap())
        .unwrap()
        .configure(UartConfig::default())
        .unwrap();
    let txdata = topology.resolve(2) + TXDATA;

    let burst: Vec<u8> = (0..UART_TX_FIFO_DEPTH as u8).map(|i| 0x30 + i).collect();
    uart.transact(&burst);
    assert_eq!(bus.writes_to(txdata), as_words(&burst));

    // 空序列不产生任何总线访问
    bus.take_log();
    uart.transact(&[]);
    assert!(bus.log().is_empty());
}

#[test]
fn test_clock_enabled_before_threshold() {
    let topology = Topology::new(UART_TOPOLOGY).unwrap();
    let bus = SimBus::armed();
    UartController::new(ArmedBus::assume_armed(&bus), topology.instance(3).unwrap())
        .unwrap()
        .configure(UartConfig::default())
        .unwrap();

    let base = topology.resolve(3);
    let writes: Vec<usize> = bus
        .log()
        .into_iter()
        .filter(Access::is_write)
        .map(|a| a.addr() - base)
        .collect();
    let gclk = writes.iter().position(|&off| off == GCLK).unwrap();
    let threshold = writes.iter().position(|&off| off == TX_FIFO_THRESHOLD).unwrap();
    assert!(gclk < threshold);
}

#[test]
fn test_formatted_output_and_flush() {
    let topology = Topology::new(UART_TOPOLOGY).unwrap();
    let bus = SimBus::armed();
    let mut uart = UartController::new(ArmedBus::assume_armed(&bus), topology.instance(7).unwrap())
        .unwrap()
        .configure(UartConfig::default())
        .unwrap();

    writeln!(uart, "Test{}", 7).unwrap();
    assert_eq!(bus.writes_to(topology.resolve(7) + TXDATA), as_words(b"Test7\n"));

    bus.script_reads(topology.resolve(7) + TX_FIFO_LEVEL, &[6, 2]);
    let mut poller = Poller::new(WaitPolicy::Forever, CountingBackoff::default());
    assert_eq!(uart.flush_with(&mut poller), Ok(3));
    assert_eq!(poller.backoff().relaxes, 2);
}

#[test]
fn test_flush_deadline() {
    let topology = Topology::new(UART_TOPOLOGY).unwrap();
    let bus = SimBus::armed();
    let uart = UartController::new(ArmedBus::assume_armed(&bus), topology.instance(1).unwrap())
        .unwrap()
        .configure(UartConfig::default())
        .unwrap();
    bus.poke(topology.resolve(1) + TX_FIFO_LEVEL, 16);

    let clock = SteppingClock::new(1);
    let mut poller = Poller::new(WaitPolicy::Deadline(4), CountingBackoff::default()).with_clock(&clock);
    assert_eq!(uart.flush_with(&mut poller), Err(PeriphError::TimedOut { polls: 4 }));
}
