//! Invasion Headless Simulation Harness
//!
//! Replays gameplay scenarios against the engine and checks the outcomes.
//! Runs entirely in-process - no window, no input devices, no rendering.
//!
//! Usage:
//!   cargo run -p invasion-simtest
//!   cargo run -p invasion-simtest -- --verbose
//!   cargo run -p invasion-simtest -- --config my_balance.json --seed 7 --dump

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use invasion_core::prelude::*;
use invasion_logic::config::{ConversionMode, QuestConfig, SpawnConfig};
use invasion_logic::currency::{Currency, CurrencyBundle};
use invasion_logic::geometry::Vec2;
use invasion_logic::kinds::KindTable;
use invasion_logic::quests::{Quest, QuestGoal, QuestStatus};
use serde::Serialize;

// ── Balance file (same values as GameConfig::default) ───────────────────
const BALANCE_JSON: &str = include_str!("../../../data/balance.json");

const FRAME: f32 = 1.0 / 60.0;
const DEFAULT_SEED: u64 = 42;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

/// `--dump` output
#[derive(Serialize)]
struct Report<'a> {
    seed: Option<u64>,
    results: &'a [TestResult],
    snapshot: Option<&'a WorldSnapshot>,
}

struct Options {
    verbose: bool,
    dump: bool,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    soak_seconds: f32,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        verbose: false,
        dump: false,
        config_path: None,
        seed: None,
        soak_seconds: 300.0,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" | "-v" => opts.verbose = true,
            "--dump" => opts.dump = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                opts.config_path = Some(PathBuf::from(path));
            }
            "--seed" => {
                let raw = args.next().context("--seed needs a value")?;
                opts.seed = Some(raw.parse().with_context(|| format!("bad seed `{}`", raw))?);
            }
            "--soak" => {
                let raw = args.next().context("--soak needs a number of seconds")?;
                opts.soak_seconds = raw
                    .parse()
                    .with_context(|| format!("bad soak duration `{}`", raw))?;
            }
            other => bail!("unknown argument `{}`", other),
        }
    }
    Ok(opts)
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading balance file {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing balance file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating balance file {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = parse_args()?;
    let mut balance = match &opts.config_path {
        Some(path) => load_config(path)?,
        None => serde_json::from_str::<GameConfig>(BALANCE_JSON)
            .context("parsing embedded balance.json")?,
    };
    balance.seed = opts.seed.or(balance.seed).or(Some(DEFAULT_SEED));
    log::info!("Harness seed {:?}", balance.seed);

    println!("=== Invasion Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Balance data
    results.extend(validate_balance(&balance, opts.verbose));

    // 2. Collect & deposit
    results.extend(validate_collect_and_deposit(&balance));

    // 3. Upgrade shop
    results.extend(validate_upgrades(&balance));

    // 4. Quest lifecycle
    results.extend(validate_quests(&balance));

    // 5. Respawn timing
    results.extend(validate_respawn(&balance));

    // 6. Session state machine
    results.extend(validate_session(&balance));

    // 7. Autopilot soak, both economies
    let mut final_snapshot = None;
    for mode in [ConversionMode::Deferred, ConversionMode::Immediate] {
        let config = GameConfig {
            conversion: mode,
            ..balance.clone()
        };
        let (soak, snapshot) = soak_run(config, opts.soak_seconds, opts.verbose);
        results.extend(soak);
        if mode == balance.conversion {
            final_snapshot = snapshot;
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if opts.dump {
        let report = Report {
            seed: balance.seed,
            results: &results,
            snapshot: final_snapshot.as_ref(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

/// Deterministic setup: stationary one-meat collectibles with a fixed 2s
/// respawn, far from where scenarios park the agent.
fn scripted(balance: &GameConfig, count: usize) -> GameConfig {
    GameConfig {
        kinds: KindTable::uniform(),
        conversion: ConversionMode::Deferred,
        spawn: SpawnConfig {
            count,
            respawn_min: 2.0,
            respawn_max: 2.0,
            ..balance.spawn.clone()
        },
        starting_balances: CurrencyBundle::ZERO,
        idle_income: Default::default(),
        session_time_limit: None,
        ..balance.clone()
    }
}

fn build(config: GameConfig) -> Result<SimulationEngine, String> {
    SimulationEngine::new(config).map_err(|e| e.to_string())
}

fn field_point(engine: &SimulationEngine) -> Vec2 {
    let center = engine.arena().center();
    Vec2::new(center.x - 12.0, center.y + 16.0)
}

fn stack_at(engine: &mut SimulationEngine, n: usize, at: Vec2) {
    engine.agent_mut().position = at;
    let targets: Vec<_> = engine.collectibles().iter().take(n).copied().collect();
    for entity in targets {
        if let Ok(mut pos) = engine.world.get::<&mut Position>(entity) {
            pos.0 = at;
        }
    }
}

fn is_alive(engine: &SimulationEngine, i: usize) -> bool {
    engine
        .collectibles()
        .get(i)
        .and_then(|&e| engine.world.get::<&Collectible>(e).ok().map(|c| c.is_alive()))
        .unwrap_or(false)
}

// ── 1. Balance Data ─────────────────────────────────────────────────────

fn validate_balance(balance: &GameConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Balance Data ---");
    let mut results = Vec::new();

    let embedded: Result<GameConfig, _> = serde_json::from_str(BALANCE_JSON);
    let matches_default = match &embedded {
        Ok(cfg) => {
            let mut cfg = cfg.clone();
            cfg.seed = None;
            cfg == GameConfig::default()
        }
        Err(_) => false,
    };
    results.push(check(
        "balance_embedded_matches_default",
        matches_default,
        match &embedded {
            Ok(_) => "data/balance.json equals GameConfig::default()".to_string(),
            Err(e) => format!("JSON parse error: {}", e),
        },
    ));

    let valid = balance.validate();
    results.push(check(
        "balance_validates",
        valid.is_ok(),
        match valid {
            Ok(()) => "config passes validation".to_string(),
            Err(e) => e.to_string(),
        },
    ));

    let ids: Vec<&str> = balance.upgrades.iter().map(|u| u.id.as_str()).collect();
    let stat_quests_ok = balance
        .quests
        .starters
        .iter()
        .chain(&balance.quests.follow_ups)
        .all(|q| match &q.goal {
            QuestGoal::UpgradeLevel(id) => ids.contains(&id.as_str()),
            QuestGoal::Resource(_) => true,
        });
    results.push(check(
        "balance_quest_upgrade_ids",
        stat_quests_ok,
        "every upgrade quest names a catalog upgrade",
    ));

    if verbose {
        println!("  Kinds:");
        for k in balance.kinds.entries() {
            println!(
                "    {:9} value={} size={} speed={} -> {} (weight {})",
                k.kind.name(),
                k.value,
                k.size,
                k.move_speed,
                k.currency,
                k.spawn_weight
            );
        }
        println!("  Upgrades: {}", ids.join(", "));
    }

    results
}

// ── 2. Collect & Deposit ────────────────────────────────────────────────

fn validate_collect_and_deposit(balance: &GameConfig) -> Vec<TestResult> {
    println!("--- Collect & Deposit ---");
    let mut results = Vec::new();

    let mut engine = match build(scripted(balance, 4)) {
        Ok(e) => e,
        Err(e) => return vec![check("collect_setup", false, e)],
    };
    let at = field_point(&engine);
    stack_at(&mut engine, 4, at);
    engine.tick(FRAME, &MoveInput::NONE);

    let max = engine.agent().max_cargo();
    results.push(check(
        "collect_fills_to_max",
        engine.agent().cargo_count() == max,
        format!("cargo {}/{}", engine.agent().cargo_count(), max),
    ));
    results.push(check(
        "collect_full_leaves_survivor",
        is_alive(&engine, 3),
        "fourth overlapping collectible stays alive",
    ));

    let base = engine.config().base.position;
    engine.agent_mut().position = base;
    engine.tick(FRAME, &MoveInput::NONE);
    let meat = engine.resources().balance(Currency::Meat);
    results.push(check(
        "deposit_converts_cargo",
        meat == max as u64 && engine.agent().cargo_count() == 0,
        format!("meat={} cargo={}", meat, engine.agent().cargo_count()),
    ));

    engine.tick(FRAME, &MoveInput::NONE);
    results.push(check(
        "deposit_empty_is_noop",
        engine.resources().balance(Currency::Meat) == meat,
        "second tick at base with empty cargo adds nothing",
    ));

    results
}

// ── 3. Upgrades ─────────────────────────────────────────────────────────

fn validate_upgrades(balance: &GameConfig) -> Vec<TestResult> {
    println!("--- Upgrade Shop ---");
    let mut results = Vec::new();

    let mut engine = match build(scripted(balance, 0)) {
        Ok(e) => e,
        Err(e) => return vec![check("upgrade_setup", false, e)],
    };
    let cost = engine.upgrades().get_cost("cargo");
    let short = cost.meat.saturating_sub(1);
    engine.resources_mut().add(Currency::Meat, short);

    let refused = !engine.purchase_upgrade("cargo");
    results.push(check(
        "upgrade_refused_when_short",
        refused && engine.resources().balance(Currency::Meat) == short,
        format!("meat={} cost={}", short, cost),
    ));

    engine.resources_mut().add(Currency::Meat, 1);
    let before = engine.agent().max_cargo();
    let bought = engine.purchase_upgrade("cargo");
    results.push(check(
        "upgrade_cargo_applies",
        bought
            && engine.resources().balance(Currency::Meat) == 0
            && engine.upgrades().level("cargo") == 1
            && engine.agent().max_cargo() > before,
        format!(
            "level={} max_cargo {} -> {}",
            engine.upgrades().level("cargo"),
            before,
            engine.agent().max_cargo()
        ),
    ));

    let next = engine.upgrades().get_cost("cargo");
    results.push(check(
        "upgrade_cost_scales",
        next == cost.scaled(2),
        format!("next cost {}", next),
    ));

    results
}

// ── 4. Quests ───────────────────────────────────────────────────────────

fn validate_quests(balance: &GameConfig) -> Vec<TestResult> {
    println!("--- Quest Lifecycle ---");
    let mut results = Vec::new();

    let reward = CurrencyBundle::new(0, 2, 0, 0);
    let config = GameConfig {
        quests: QuestConfig {
            active_capacity: 1,
            starters: vec![Quest::new(
                "Five Meat",
                "Hold 5 meat",
                QuestGoal::Resource(Currency::Meat),
                5,
                reward,
            )],
            follow_ups: Vec::new(),
        },
        ..scripted(balance, 0)
    };
    let mut engine = match build(config) {
        Ok(e) => e,
        Err(e) => return vec![check("quest_setup", false, e)],
    };

    let mut statuses = Vec::new();
    let mut early_claim = false;
    for add in [0, 3, 2] {
        engine.resources_mut().add(Currency::Meat, add);
        engine.tick(FRAME, &MoveInput::NONE);
        statuses.push(engine.quests().active()[0].status());
        if statuses.len() < 3 {
            early_claim |= engine.claim_quest(0);
        }
    }
    results.push(check(
        "quest_completes_at_target",
        statuses == [QuestStatus::Active, QuestStatus::Active, QuestStatus::Completed],
        format!("{:?}", statuses),
    ));
    results.push(check(
        "quest_early_claim_refused",
        !early_claim,
        "claim before completion returns false",
    ));

    let first = engine.claim_quest(0);
    let second = engine.claim_quest(0);
    results.push(check(
        "quest_claimed_once",
        first && !second && engine.resources().balance(Currency::Eggs) == reward.eggs,
        format!(
            "first={} second={} eggs={}",
            first,
            second,
            engine.resources().balance(Currency::Eggs)
        ),
    ));

    results
}

// ── 5. Respawn ──────────────────────────────────────────────────────────

fn validate_respawn(balance: &GameConfig) -> Vec<TestResult> {
    println!("--- Respawn Timing ---");
    let mut results = Vec::new();

    let mut engine = match build(scripted(balance, 1)) {
        Ok(e) => e,
        Err(e) => return vec![check("respawn_setup", false, e)],
    };
    let at = field_point(&engine);
    stack_at(&mut engine, 1, at);
    engine.tick(0.5, &MoveInput::NONE);

    let mut dormant_ticks = 0;
    while !is_alive(&engine, 0) && engine.agent().cargo_count() == 1 && dormant_ticks < 20 {
        engine.tick(0.5, &MoveInput::NONE);
        dormant_ticks += 1;
    }
    // 2s delay at 0.5s ticks: dormant for three ticks, revived and eaten on the fourth.
    results.push(check(
        "respawn_after_delay",
        dormant_ticks == 4 && engine.agent().cargo_count() == 2,
        format!(
            "recollected after {} ticks, cargo={}",
            dormant_ticks,
            engine.agent().cargo_count()
        ),
    ));

    results
}

// ── 6. Session ──────────────────────────────────────────────────────────

fn validate_session(balance: &GameConfig) -> Vec<TestResult> {
    println!("--- Session State Machine ---");
    let mut results = Vec::new();

    let config = GameConfig {
        session_time_limit: Some(2.0),
        ..scripted(balance, 4)
    };
    let mut session = match GameSession::new(config) {
        Ok(s) => s,
        Err(e) => return vec![check("session_setup", false, e.to_string())],
    };
    let right = MoveInput {
        right: true,
        ..MoveInput::NONE
    };

    session.update(FRAME, &right);
    let menu_idle = session.engine().frame() == 0;
    let started = session.handle(Command::StartGame);
    results.push(check(
        "session_menu_then_start",
        menu_idle && started && session.state() == GameState::Playing,
        format!("{:?}", session.state()),
    ));

    session.handle(Command::OpenUpgradePanel);
    let before = session.engine().agent().position;
    session.update(FRAME, &right);
    let frozen = session.engine().agent().position == before;
    session.handle(Command::CloseUpgradePanel);
    session.update(FRAME, &right);
    let moved = session.engine().agent().position.x > before.x;
    results.push(check(
        "session_panel_blocks_movement",
        frozen && moved,
        format!("frozen={} moved_after_close={}", frozen, moved),
    ));

    session.handle(Command::TogglePause);
    let frames = session.engine().frame();
    session.update(FRAME, &right);
    let paused_ok = session.engine().frame() == frames;
    session.handle(Command::TogglePause);
    results.push(check(
        "session_pause_freezes",
        paused_ok && session.state() == GameState::Playing,
        "no ticks while paused",
    ));

    for _ in 0..200 {
        session.update(FRAME, &MoveInput::NONE);
    }
    let over = session.state() == GameState::GameOver;
    let restarted = session.handle(Command::Restart);
    results.push(check(
        "session_time_limit_and_restart",
        over && restarted && session.state() == GameState::Playing && session.engine().frame() == 0,
        format!("game_over={} restarted={}", over, restarted),
    ));

    results
}

// ── 7. Autopilot Soak ───────────────────────────────────────────────────

/// Nearest live collectible, or the base once the hold is full or the arena is empty.
fn autopilot_target(engine: &SimulationEngine) -> Vec2 {
    let agent = engine.agent();
    let base = engine.config().base.position;
    if agent.is_full() {
        return base;
    }
    let nearest = engine
        .collectibles()
        .iter()
        .filter_map(|&e| {
            let c = engine.world.get::<&Collectible>(e).ok()?;
            if !c.is_alive() {
                return None;
            }
            engine.world.get::<&Position>(e).ok().map(|p| p.0)
        })
        .min_by(|a, b| {
            a.distance_squared(&agent.position)
                .total_cmp(&b.distance_squared(&agent.position))
        });
    match nearest {
        Some(p) => p,
        None if agent.cargo_count() > 0 => base,
        None => agent.position,
    }
}

fn spend_and_claim(engine: &mut SimulationEngine) -> (u32, u32) {
    let mut bought = 0;
    let ids: Vec<String> = engine.upgrades().iter().map(|u| u.def.id.clone()).collect();
    for id in &ids {
        while engine.upgrades().can_purchase(id, engine.resources()) {
            if !engine.purchase_upgrade(id) {
                break;
            }
            bought += 1;
        }
    }

    let mut claimed = 0;
    while let Some(i) = engine
        .quests()
        .active()
        .iter()
        .position(|q| q.status() == QuestStatus::Completed)
    {
        if !engine.claim_quest(i) {
            break;
        }
        claimed += 1;
    }
    (bought, claimed)
}

fn soak_run(
    config: GameConfig,
    seconds: f32,
    verbose: bool,
) -> (Vec<TestResult>, Option<WorldSnapshot>) {
    let mode = config.conversion;
    let tag = match mode {
        ConversionMode::Deferred => "deferred",
        ConversionMode::Immediate => "immediate",
    };
    println!("--- Autopilot Soak ({}) ---", tag);
    let mut results = Vec::new();

    let mut session = match GameSession::new(config) {
        Ok(s) => s,
        Err(e) => {
            results.push(check(&format!("soak_{}_setup", tag), false, e.to_string()));
            return (results, None);
        }
    };
    session.handle(Command::StartGame);

    let frames = (seconds / FRAME).ceil() as u64;
    let mut cargo_ok = true;
    let mut bounds_ok = true;
    let mut earned_monotone = true;
    let mut deposits = 0u32;
    let mut collected = 0u32;
    let mut upgrades_bought = 0u32;
    let mut quests_claimed = 0u32;
    let mut last_earned = CurrencyBundle::ZERO;

    for _ in 0..frames {
        let target = autopilot_target(session.engine());
        session.set_pointer_target(target);
        session.update(FRAME, &MoveInput::NONE);

        for event in session.drain_events() {
            match event {
                GameEvent::Collected { .. } => collected += 1,
                GameEvent::Deposited { .. } => deposits += 1,
                _ => {}
            }
        }

        let (bought, claimed) = spend_and_claim(session.engine_mut());
        upgrades_bought += bought;
        quests_claimed += claimed;

        let engine = session.engine();
        let agent = engine.agent();
        cargo_ok &= agent.cargo_count() <= agent.max_cargo();
        bounds_ok &= engine.arena().contains(&agent.position, agent.size() / 2.0);
        let earned = engine.resources().total_earned();
        earned_monotone &= Currency::ALL
            .iter()
            .all(|&c| earned.get(c) >= last_earned.get(c));
        last_earned = earned;
    }

    let snapshot = session.snapshot();
    results.push(check(
        &format!("soak_{}_cargo_bound", tag),
        cargo_ok,
        "cargo never exceeded max_cargo",
    ));
    results.push(check(
        &format!("soak_{}_agent_in_arena", tag),
        bounds_ok,
        "agent body stayed inside the arena",
    ));
    results.push(check(
        &format!("soak_{}_earned_monotone", tag),
        earned_monotone,
        "lifetime earnings never decreased",
    ));
    results.push(check(
        &format!("soak_{}_progress", tag),
        deposits > 0 && collected > 0,
        format!(
            "{} collected, {} deposits, {} upgrades, {} quests in {:.0}s",
            collected, deposits, upgrades_bought, quests_claimed, seconds
        ),
    ));

    if verbose {
        println!(
            "  balances: {}  tier: {:?}  cargo {}/{}",
            snapshot.balances, snapshot.agent.tier, snapshot.agent.cargo, snapshot.agent.max_cargo
        );
        for u in &snapshot.upgrades {
            println!("    {:10} level {}/{}", u.id, u.level, u.max_level);
        }
    }

    (results, Some(snapshot))
}
