use std::fs;
use std::io;
use std::path::Path;

use duelmind::config::DuelConfig;
use duelmind::controller::{
    HumanController, PredictiveController, RandomController, ScriptedController,
};
use duelmind::duel::{Duel, MatchReport};
use duelmind::predictor::OnlineLogit;
use duelmind::simulate::run_batch;
use duelmind::utils::{DuelError, Side};

const MODEL_PATH: &str = "models/adaptive.json";

fn main() {
    let _ = env_logger::try_init();
    if let Err(e) = menu_loop() {
        eprintln!("fatal: {}", e);
        std::process::exit(1);
    }
}

fn read_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_number(label: &str, current: i64) -> Result<i64, DuelError> {
    println!("{} [{}]:", label, current);
    let line = read_line()?;
    if line.is_empty() {
        return Ok(current);
    }
    match line.parse() {
        Ok(v) => Ok(v),
        Err(_) => {
            println!("Invalid value, keeping {}", current);
            Ok(current)
        }
    }
}

fn menu_loop() -> Result<(), DuelError> {
    let mut cfg = DuelConfig {
        narrate: true,
        ..DuelConfig::default()
    };
    let mut model = OnlineLogit::for_config(&cfg);

    loop {
        println!("=== duelmind ===");
        println!("1. Play against the adaptive AI");
        println!("2. Play against the scripted AI");
        println!("3. Play against the random AI");
        println!("4. Watch adaptive vs scripted");
        println!("5. Evaluation batch (adaptive vs scripted)");
        println!("6. Parameters");
        println!("7. Save adaptive model");
        println!("8. Load adaptive model");
        println!("0. Quit");

        match read_line()?.as_str() {
            "1" => model = play_adaptive(cfg, model)?,
            "2" => {
                let mut human = HumanController::new("You");
                let mut bot = ScriptedController::new("Scripted");
                report_for_human(Duel::new(cfg, &mut human, &mut bot).run()?);
            }
            "3" => {
                let mut human = HumanController::new("You");
                let mut bot = RandomController::new("Random");
                report_for_human(Duel::new(cfg, &mut human, &mut bot).run()?);
            }
            "4" => model = watch_adaptive(cfg, model)?,
            "5" => model = evaluation_batch(cfg, model)?,
            "6" => {
                let (next_cfg, reset) = parameters_menu(cfg)?;
                cfg = next_cfg;
                if reset {
                    println!("Encoder layout changed, starting from a fresh model.");
                    model = OnlineLogit::for_config(&cfg);
                }
            }
            "7" => {
                if let Some(dir) = Path::new(MODEL_PATH).parent() {
                    fs::create_dir_all(dir)?;
                }
                model.save(Path::new(MODEL_PATH))?;
                println!(
                    "Saved to {} ({} examples seen)",
                    MODEL_PATH,
                    model.examples_seen()
                );
            }
            "8" => match OnlineLogit::load(Path::new(MODEL_PATH)) {
                Ok(loaded) if loaded.feature_len() == cfg.feature_len() => {
                    println!("Loaded {} ({} examples seen)", MODEL_PATH, loaded.examples_seen());
                    model = loaded;
                }
                Ok(_) => {
                    println!("Saved model does not fit the current parameters, keeping the current one.");
                }
                Err(e) => println!("Could not load model: {}", e),
            },
            "0" => return Ok(()),
            _ => println!("Invalid choice"),
        }
    }
}

fn play_adaptive(cfg: DuelConfig, model: OnlineLogit) -> Result<OnlineLogit, DuelError> {
    let mut human = HumanController::new("You");
    let mut bot = PredictiveController::new(cfg, model, "Adaptive");
    let report = Duel::new(cfg, &mut human, &mut bot).run()?;
    report_for_human(report);
    if let Some(acc) = report.predictions[Side::P2.index()].accuracy() {
        println!("The AI read you {:.0}% of the time.", acc * 100.0);
    }
    Ok(bot.into_predictor())
}

fn watch_adaptive(cfg: DuelConfig, model: OnlineLogit) -> Result<OnlineLogit, DuelError> {
    let mut bot = PredictiveController::new(cfg, model, "Adaptive");
    let mut foil = ScriptedController::new("Scripted");
    let report = Duel::new(cfg, &mut bot, &mut foil).run()?;
    if let Some(acc) = report.predictions[Side::P1.index()].accuracy() {
        println!("Adaptive prediction accuracy: {:.0}%", acc * 100.0);
    }
    Ok(bot.into_predictor())
}

fn evaluation_batch(cfg: DuelConfig, model: OnlineLogit) -> Result<OnlineLogit, DuelError> {
    let matches = prompt_number("How many matches", 100)?.max(1) as u32;
    let quiet = DuelConfig {
        narrate: false,
        ..cfg
    };
    let mut bot = PredictiveController::new(quiet, model, "Adaptive");
    let mut foil = ScriptedController::new("Scripted");
    let report = run_batch(quiet, matches, &mut bot, &mut foil)?;
    println!("{}", report.summary());
    Ok(bot.into_predictor())
}

fn parameters_menu(cfg: DuelConfig) -> Result<(DuelConfig, bool), DuelError> {
    println!("Current parameters (empty input keeps a value):");
    let max_health = prompt_number("Max health", cfg.max_health as i64)?.max(1) as i32;
    let max_mana = prompt_number("Max mana", cfg.max_mana as i64)?.max(1) as i32;
    let starting_mana = prompt_number("Starting mana", cfg.starting_mana as i64)?
        .clamp(0, max_mana as i64) as i32;
    let max_turns = prompt_number("Turn cap", cfg.max_turns as i64)?.max(1) as u32;
    let window = prompt_number("History window", cfg.window as i64)?.max(1) as usize;

    let next = DuelConfig {
        window,
        max_health,
        max_mana,
        starting_mana,
        max_turns,
        narrate: cfg.narrate,
    };
    let reset = next.feature_len() != cfg.feature_len();
    Ok((next, reset))
}

fn report_for_human(report: MatchReport) {
    if report.timed_out {
        println!("Decided on remaining resources after {} rounds.", report.rounds);
    }
}
