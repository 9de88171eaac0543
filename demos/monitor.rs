use std::time::Duration;

use touchbridge::{DriverConfig, InputEvent, TouchDriver};

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => DriverConfig::load(&path).expect("load config"),
        None => DriverConfig::default(),
    };

    let driver = TouchDriver::new(config);
    let list = driver.enumerate();

    println!("Discovered {} touch device(s)", list.len());
    for (i, descriptor) in list.iter().enumerate() {
        println!(
            "  [{}] {} ({})",
            i,
            descriptor.path,
            descriptor.meta.name.as_deref().unwrap_or("unknown")
        );
    }

    if list.is_empty() {
        return;
    }

    let mut sessions = Vec::new();
    for index in 0..list.len() {
        let sink = Box::new(move |ev: &InputEvent| println!("[dev {index}] {ev:?}"));
        match driver.open_device(&list, index, sink) {
            Ok((info, session)) => {
                println!("Opened [{}] as {:?} '{}'", index, info.class, info.name);
                sessions.push(session);
            }
            Err(err) => eprintln!("Failed to open [{index}]: {err}"),
        }
    }

    println!("Monitoring; Ctrl-C to quit.");
    while sessions.iter().any(|s| s.is_running()) {
        std::thread::sleep(Duration::from_millis(200));
    }
    println!("All sample streams ended.");
}
