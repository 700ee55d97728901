#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use speechtask::{app, SpeechTaskApp};

fn parse_startup_config() -> app::StartupConfig {
    let mut cfg = app::StartupConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                if let Some(p) = args.next() {
                    cfg.settings_path = Some(std::path::PathBuf::from(p));
                }
            }
            "--audio-dir" => {
                if let Some(p) = args.next() {
                    cfg.audio_dir = Some(std::path::PathBuf::from(p));
                }
            }
            "--sentence-dir" => {
                if let Some(p) = args.next() {
                    cfg.sentence_dir = Some(std::path::PathBuf::from(p));
                }
            }
            "--lists" => {
                if let Some(v) = args.next() {
                    cfg.lists = Some(v);
                }
            }
            "--subject" => {
                if let Some(v) = args.next() {
                    cfg.subject = Some(v);
                }
            }
            "--condition" => {
                if let Some(v) = args.next() {
                    cfg.condition = Some(v);
                }
            }
            "--debug" => {
                cfg.debug = true;
            }
            "--debug-log" => {
                if let Some(p) = args.next() {
                    cfg.debug = true;
                    cfg.debug_log = Some(std::path::PathBuf::from(p));
                }
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage:\n  speechtask [options]\n\nOptions:\n  --settings <pars.json>\n  --audio-dir <dir>\n  --sentence-dir <dir>\n  --lists <\"1 2 3\">\n  --subject <id>\n  --condition <name>\n  --debug\n  --debug-log <path>\n  --help"
                );
                std::process::exit(0);
            }
            _ => {}
        }
    }
    cfg
}

fn main() -> eframe::Result<()> {
    let startup = parse_startup_config();
    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size([760.0, 480.0])
        .with_inner_size([960.0, 600.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "Speech Task Controller",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(
                SpeechTaskApp::new(cc, startup.clone()).expect("failed to init app"),
            ))
        }),
    )
}
