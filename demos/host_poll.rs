use plugaxes::backends::default_factories;
use plugaxes::backends::host::{HostFeed, HostLayout};
use plugaxes::{AxisRouter, BindingStore, EventFilter, Logger, ProviderManager, VirtualAxisBinder};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let feed = HostFeed::new();
    let manager = ProviderManager::discover(default_factories(HostLayout::default(), feed.clone()));
    let path = std::env::temp_dir().join("plugaxes_demo_axes.json");
    let mut binder = VirtualAxisBinder::open(manager, BindingStore::new(&path));

    println!("Controls:");
    for name in binder.manager().all_control_names() {
        println!("- {name}");
    }
    println!("Virtual axes:");
    for axis in binder.axes() {
        println!("- {} ({:?}) -> {:?}", axis.name(), axis.control_type(), axis.bound_control());
    }

    let mut router = AxisRouter::new();
    router.sync_axes(binder.bindings());
    router
        .on_button("Jump", |down| println!("Jump {}", if down { "down" } else { "up" }))
        .on_normalized("MoveX", |v| println!("MoveX {v:.2}"))
        .on_ascii("Text", |c| println!("Text {c:?}"));
    binder.add_listener(router, EventFilter::All);
    binder.add_listener(Logger::new("axes"), EventFilter::DevicesOnly);

    // Stand-in for the host's per-frame input pump.
    for frame in 0..6 {
        match frame {
            1 => feed.set_button("Jump", true),
            2 => feed.set_button("Jump", false),
            3 => feed.set_axis("Horizontal", 0.5),
            4 => feed.type_text("ok"),
            5 => feed.set_joystick_connected(0, false),
            _ => {}
        }
        binder.update_input();
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let removed = binder.manager().shutdown();
    binder.dispatch(&removed);
}
