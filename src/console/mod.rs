//! # Console Module - Menu State Machine
//!
//! The interactive surface of the game: a line-based terminal that moves
//! between the main menu, the town (with its shop, sell and warehouse
//! sub-menus) and the mine. Every command is a single case-insensitive letter.
//! Bad input is reported and the same prompt comes back.
//!
//! [`Console`] wraps any `BufRead`/`Write` pair so scripted input drives the
//! same code path as a real terminal. When input runs out the controller
//! stops as if the player had quit.
//!
//! ```rust,no_run
//! use rand::SeedableRng;
//! use sundrop::config::Config;
//! use sundrop::console::{Console, Controller};
//! use sundrop::game::session::load_levels;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let grids = load_levels(&config.levels)?;
//!     let rng = rand::rngs::StdRng::seed_from_u64(7);
//!     let mut controller = Controller::new(config, grids, rng);
//!     let stdin = std::io::stdin();
//!     let mut console = Console::new(stdin.lock(), std::io::stdout());
//!     controller.run(&mut console)?;
//!     Ok(())
//! }
//! ```

use log::{info, warn};
use rand::Rng;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::error::GameError;
use crate::game::day::{self, DayReport, DayTrigger};
use crate::game::economy::{self, RetrieveOutcome, SellSource};
use crate::game::explore::{self, Direction};
use crate::game::player::TOWN_LEVEL;
use crate::game::shop::{self, ShopItem};
use crate::game::{render, DoorLinks, Grid, LevelId, Mineral, Position, Session};
use crate::storage::{self, scores};
use crate::validation::{escape_for_log, sanitize_player_name};

const INTRO: &str = "\
---------------- Welcome to Sundrop Caves! ----------------
You spent all your money to get the deed to a mine, a small
  backpack, a simple pickaxe and a magical portal stone.
";

const MAIN_MENU: &str = "
--- Main Menu ----
(N)ew game
(L)oad saved game
(H)igh scores
(Q)uit
------------------";

const TOWN_MENU: &str = "\
----- Sundrop Town -----
(B)uy stuff
See Player (I)nformation
See Mine (M)ap
(E)nter mine
(S)ell ore
(W)arehouse
Sa(V)e game
(Q)uit to main menu
------------------------";

const SHOP_RULE: &str = "-----------------------------------------------------------";
const MINE_RULE: &str = "---------------------------------------------------";

/// Line-oriented terminal over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Print `text` followed by a newline.
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Print `text` exactly as given.
    pub fn show(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())
    }

    /// Ask a question and return the trimmed answer, or `None` once input is exhausted.
    pub fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        self.output.write_all(question.as_bytes())?;
        self.output.flush()?;
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        // Undecodable bytes become U+FFFD and fall through to the menu's "Invalid" path.
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    /// Like [`Console::prompt`], with end of input turned into `UnexpectedEof`.
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.prompt(question)?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
    }

    /// Menu answer, lowercased.
    fn choice(&mut self, question: &str) -> io::Result<String> {
        Ok(self.ask(question)?.to_lowercase())
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.choice(question)? == "y")
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Main,
    Town,
    Exit,
}

/// Owns the pristine maps, the configuration, the random source and the
/// current game, and walks the player through the menus.
pub struct Controller<G: Rng> {
    config: Config,
    grids: BTreeMap<LevelId, Grid>,
    doors: DoorLinks,
    rng: G,
    session: Option<Session>,
}

impl<G: Rng> Controller<G> {
    pub fn new(config: Config, grids: BTreeMap<LevelId, Grid>, rng: G) -> Self {
        let doors = DoorLinks::from_config(&config.doors);
        Controller {
            config,
            grids,
            doors,
            rng,
            session: None,
        }
    }

    /// The game in progress, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Run until the player quits or input ends.
    pub fn run<I: BufRead, O: Write>(&mut self, con: &mut Console<I, O>) -> io::Result<()> {
        con.say(INTRO)?;
        con.say(&format!(
            "How quickly can you get the {} GP you need to retire\n  and live happily ever after?\n{}",
            self.config.game.win_gp, SHOP_RULE
        ))?;
        let mut screen = Screen::Main;
        loop {
            let next = match screen {
                Screen::Main => self.main_menu(con),
                Screen::Town => self.town_menu(con),
                Screen::Exit => return Ok(()),
            };
            screen = match next {
                Ok(s) => s,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    info!("input closed; leaving the game");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
        }
    }

    fn main_menu<I: BufRead, O: Write>(&mut self, con: &mut Console<I, O>) -> io::Result<Screen> {
        con.say(MAIN_MENU)?;
        match con.choice("Your choice? ")?.as_str() {
            "n" => {
                let raw = con.ask("\nGreetings, miner! What is your name? ")?;
                let name = sanitize_player_name(&raw);
                let session = Session::new_game(
                    &name,
                    &self.grids,
                    self.config.game.clone(),
                    self.doors.clone(),
                );
                info!("new game for {}", escape_for_log(&name));
                con.say(&format!(
                    "\nPleased to meet you, {}. Welcome to Sundrop Town!\n",
                    name
                ))?;
                self.session = Some(session);
                Ok(Screen::Town)
            }
            "l" => self.load(con),
            "h" => {
                match scores::load_scores(&self.config.storage.scores_path()) {
                    Ok(board) => con.show(&format!("\n{}", scores::format_scores(&board)))?,
                    Err(e) => {
                        warn!("could not read scores: {}", e);
                        con.say(&format!("Could not read high scores: {}", e))?;
                    }
                }
                Ok(Screen::Main)
            }
            "q" => {
                con.say("Goodbye!")?;
                Ok(Screen::Exit)
            }
            _ => {
                con.say("Invalid choice.")?;
                Ok(Screen::Main)
            }
        }
    }

    fn load<I: BufRead, O: Write>(&mut self, con: &mut Console<I, O>) -> io::Result<Screen> {
        let path = self.config.storage.save_path();
        let restored = storage::load_game(&path)
            .and_then(|save| save.restore(self.config.game.clone(), self.doors.clone()));
        match restored {
            Ok(session) => {
                info!(
                    "loaded game for {} on day {}",
                    escape_for_log(&session.player.name),
                    session.player.day
                );
                self.session = Some(session);
                con.say("\nGame loaded. Returning to town.")?;
                Ok(Screen::Town)
            }
            Err(GameError::SaveNotFound(_)) => {
                con.say("No saved game found.")?;
                Ok(Screen::Main)
            }
            Err(e) => {
                warn!("failed to load {}: {}", path.display(), e);
                con.say(&format!("Could not load saved game: {}", e))?;
                Ok(Screen::Main)
            }
        }
    }

    fn town_menu<I: BufRead, O: Write>(&mut self, con: &mut Console<I, O>) -> io::Result<Screen> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Screen::Main);
        };
        con.say(&format!("\nDAY {}", session.player.day))?;
        con.say(TOWN_MENU)?;
        match con.choice("Your choice? ")?.as_str() {
            "b" => shop_menu(session, con)?,
            "i" => con.show(&format!("\n{}", render::player_info(&session.player)))?,
            "m" => {
                if let Some(level) = session.level(TOWN_LEVEL) {
                    let portal = session.player.portal(TOWN_LEVEL);
                    con.show(&render::full_map(
                        &level.fog,
                        Some(portal),
                        Some(Position::ORIGIN),
                    ))?;
                }
            }
            "e" => {
                mine_loop(session, &mut self.rng, con)?;
                if day::has_won(&session.player, &session.rules) {
                    celebrate(session, &self.config, con)?;
                    self.session = None;
                    return Ok(Screen::Main);
                }
            }
            "s" => sell_menu(session, &mut self.rng, con)?,
            "w" => warehouse_menu(session, con)?,
            "v" => match storage::save_game(&self.config.storage.save_path(), session) {
                Ok(()) => con.say("\nGame saved.")?,
                Err(e) => {
                    warn!("save failed: {}", e);
                    con.say(&format!("Could not save the game: {}", e))?;
                }
            },
            "q" => {
                if con.confirm("Quit to main menu? (Y/N) ")? {
                    self.session = None;
                    return Ok(Screen::Main);
                }
            }
            _ => con.say("Invalid choice.")?,
        }
        Ok(Screen::Town)
    }
}

fn single_key(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn shop_menu<I: BufRead, O: Write>(session: &mut Session, con: &mut Console<I, O>) -> io::Result<()> {
    loop {
        con.say("\n----------------------- Shop Menu -------------------------")?;
        for offer in shop::offers(&session.player, &session.rules) {
            con.say(&offer.label)?;
        }
        con.say("(L)eave shop")?;
        con.say(SHOP_RULE)?;
        con.say(&format!("GP: {}", session.player.gp))?;
        con.say(SHOP_RULE)?;
        let c = con.choice("Your choice? ")?;
        if c == "l" {
            return Ok(());
        }
        match single_key(&c).and_then(ShopItem::from_key) {
            Some(item) => match shop::buy(&mut session.player, &session.rules, item) {
                Ok(msg) => con.say(msg)?,
                Err(e) => con.say(&e.to_string())?,
            },
            None => con.say("Invalid choice.")?,
        }
    }
}

fn warehouse_menu<I: BufRead, O: Write>(session: &mut Session, con: &mut Console<I, O>) -> io::Result<()> {
    loop {
        con.say("\n----- Warehouse Menu -----")?;
        con.say("(S)tore all backpack ore in warehouse")?;
        con.say("(R)etrieve ore from warehouse to backpack")?;
        con.say("(V)iew warehouse contents")?;
        con.say("(L)eave warehouse")?;
        con.say("--------------------------")?;
        match con.choice("Your choice? ")?.as_str() {
            "s" => {
                if economy::store_all(&mut session.player) == 0 {
                    con.say("You have nothing to store.")?;
                } else {
                    con.say("All carried ore moved to warehouse.")?;
                }
            }
            "r" => match economy::retrieve(&mut session.player) {
                RetrieveOutcome::NoSpace => con.say("You have no space in your backpack.")?,
                RetrieveOutcome::Moved(_) => {
                    con.say("Retrieved ore from warehouse into backpack where possible.")?
                }
            },
            "v" => {
                let w = &session.player.warehouse;
                con.say(&format!(
                    "Warehouse contents - Gold: {}, Silver: {}, Copper: {}",
                    w.gold, w.silver, w.copper
                ))?;
            }
            "l" => return Ok(()),
            _ => con.say("Invalid choice.")?,
        }
    }
}

fn sell_menu<R: Rng + ?Sized, I: BufRead, O: Write>(
    session: &mut Session,
    rng: &mut R,
    con: &mut Console<I, O>,
) -> io::Result<()> {
    loop {
        con.say("\n----- Sell Menu -----")?;
        con.say("(B)ackpack - sell all ore in backpack")?;
        con.say("(W)arehouse - sell from warehouse")?;
        con.say("(P)art - sell chosen amounts")?;
        con.say("(L)eave sell menu")?;
        con.say("---------------------")?;
        let outcome = match con.choice("Your choice? ")?.as_str() {
            "b" => economy::sell_all(&mut session.player, SellSource::Backpack, rng),
            "w" => economy::sell_all(&mut session.player, SellSource::Warehouse, rng),
            "p" => {
                let source = match con.choice("Sell from (B)ackpack or (W)arehouse? ")?.as_str() {
                    "b" => SellSource::Backpack,
                    "w" => SellSource::Warehouse,
                    _ => {
                        con.say("Invalid choice.")?;
                        continue;
                    }
                };
                let Some(amounts) = ask_amounts(session, source, con)? else {
                    continue;
                };
                match economy::sell(&mut session.player, source, Some(&amounts), rng) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        con.say(&e.to_string())?;
                        continue;
                    }
                }
            }
            "l" => return Ok(()),
            _ => {
                con.say("Invalid choice.")?;
                continue;
            }
        };
        for line in outcome.lines() {
            con.say(&line)?;
        }
        con.say(&format!("You now have {} GP!", session.player.gp))?;
    }
}

/// Ask how much of each held mineral to sell. `None` when an answer is not a number.
fn ask_amounts<I: BufRead, O: Write>(
    session: &Session,
    source: SellSource,
    con: &mut Console<I, O>,
) -> io::Result<Option<BTreeMap<Mineral, i64>>> {
    let held = match source {
        SellSource::Backpack => session.player.backpack,
        SellSource::Warehouse => session.player.warehouse,
    };
    let mut amounts = BTreeMap::new();
    for mineral in Mineral::ALL {
        let have = held.get(mineral);
        if have == 0 {
            continue;
        }
        let answer = con.ask(&format!("How much {} to sell? (you have {}) ", mineral, have))?;
        let n = if answer.is_empty() {
            0
        } else {
            match answer.parse::<i64>() {
                Ok(n) => n,
                Err(_) => {
                    con.say("Please enter a whole number.")?;
                    return Ok(None);
                }
            }
        };
        amounts.insert(mineral, n);
    }
    Ok(Some(amounts))
}

fn mine_loop<R: Rng + ?Sized, I: BufRead, O: Write>(
    session: &mut Session,
    rng: &mut R,
    con: &mut Console<I, O>,
) -> io::Result<()> {
    session.enter_mine();
    loop {
        con.say(&format!(
            "\n{}\n{:^51}\n{}\n",
            MINE_RULE,
            format!("DAY {}", session.player.day),
            MINE_RULE
        ))?;
        con.show(&render::viewport(session))?;
        con.say(&render::mine_status(&session.player))?;
        con.say("\n(WASD) to move\n")?;
        con.say("(M)ap, (I)nformation, (P)ortal, (Q)uit to town")?;
        let act = con.choice("\nAction? ")?;

        if let Some(dir) = single_key(&act).and_then(Direction::from_key) {
            let result = explore::move_player(session, dir, rng);
            let msg = result.event.to_string();
            if !msg.is_empty() {
                con.say(&msg)?;
            }
            if let Some(report) = result.day_ended {
                report_day(session, &report, con)?;
                return Ok(());
            }
            continue;
        }

        match act.as_str() {
            "m" => {
                let level = session.player.level;
                if let Some(lvl) = session.level(level) {
                    con.show(&render::full_map(
                        &lvl.fog,
                        Some(session.player.portal(level)),
                        Some(session.player.pos),
                    ))?;
                }
            }
            "i" => con.show(&format!("\n{}", render::player_info(&session.player)))?,
            "p" => {
                let report = day::place_portal(session, rng);
                report_day(session, &report, con)?;
                return Ok(());
            }
            "q" => {
                if con.confirm("Quit to town? (Y/N) ")? {
                    day::quit_to_town(session);
                    return Ok(());
                }
            }
            _ => con.say("Invalid action.")?,
        }
    }
}

fn report_day<I: BufRead, O: Write>(
    session: &Session,
    report: &DayReport,
    con: &mut Console<I, O>,
) -> io::Result<()> {
    match report.trigger {
        DayTrigger::Exhausted => con.say("\nYou are exhausted.")?,
        DayTrigger::TownPortal | DayTrigger::PortalStone => {}
    }
    con.say("\nYou place your portal stone here and zap back to town.\n")?;
    for line in report.sale.lines() {
        con.say(&line)?;
    }
    con.say(&format!("You now have {} GP!\n", session.player.gp))
}

fn celebrate<I: BufRead, O: Write>(
    session: &Session,
    config: &Config,
    con: &mut Console<I, O>,
) -> io::Result<()> {
    let entry = scores::ScoreEntry::from_player(&session.player);
    con.say("\n-------------------------------------------------------------")?;
    con.say(&format!(
        "Woo-hoo! Well done, {}, you have {} GP!",
        session.player.name, session.player.gp
    ))?;
    con.say("You now have enough to retire and play video games every day.")?;
    con.say(&format!(
        "And it only took you {} days and {} steps! You win!",
        session.player.day, entry.steps
    ))?;
    con.say("-------------------------------------------------------------\n")?;
    match scores::record_score(&config.storage.scores_path(), entry) {
        Ok(Some(place)) => con.say(&format!("You made the high score list at #{}!", place))?,
        Ok(None) => {}
        Err(e) => {
            warn!("could not record score: {}", e);
            con.say(&format!("Could not record your score: {}", e))?;
        }
    }
    Ok(())
}
