//! Playfield entry point
//!
//! Native: loads a `GameData` document (or a built-in demo), replays a key
//! sequence against it and prints the result. The web build is driven from
//! JavaScript through `WebEditor`.

#[cfg(not(target_arch = "wasm32"))]
const DEMO_DOCUMENT: &str = r##"{
    "elements": [
        {"id": "p1", "type": "player", "x": 0, "y": 0, "width": 40, "height": 40, "color": "#00d4ff"},
        {"id": "c1", "type": "coin", "x": 50, "y": 5, "width": 30, "height": 30, "color": "#fbbf24"},
        {"id": "g1", "type": "goal", "x": 120, "y": 0, "width": 50, "height": 50, "color": "#a855f7"}
    ],
    "logic": [{"id": "l1", "type": "collect", "targetId": "c1"}],
    "backgroundColor": "#1e293b"
}"##;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use playfield::persistence::{GameDocument, LegacyKinds};
    use playfield::{Editor, Settings};

    env_logger::init();
    log::info!("Playfield (native) starting...");

    let mut args = std::env::args().skip(1);
    let document = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Cannot read {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => DEMO_DOCUMENT.to_string(),
    };
    let keys = args.next().unwrap_or_else(|| "dddddddddddd".to_string());

    let settings = Settings {
        legacy_kinds: LegacyKinds::Preserve,
        ..Settings::load()
    };
    let scene = GameDocument::from_json_lossy(&document).into_scene(settings.legacy_kinds, 0);
    let editor = Editor::new(scene, &settings);
    println!(
        "Loaded {} entities, {} rules",
        editor.scene().len(),
        editor.scene().rules().len()
    );

    let mut playback = match editor.play() {
        Ok(playback) => playback,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    for key in keys.chars() {
        for event in playback.handle_key(&key.to_string()) {
            log::info!("{:?}", event);
        }
    }

    let frame = playback.frame();
    println!("Score: {}", frame.score);
    match frame.banner {
        Some(banner) => println!("{}", banner),
        None => println!("Still playing ({:?})", frame.phase),
    }

    match editor.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Cannot serialize scene: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `playfield::web::start`, this is just to satisfy the compiler
}
