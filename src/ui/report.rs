/// Text report of a board: terrain, targets and hint fields.
///
/// Everything goes through `queue!` on one writer and is flushed once at
/// the end. Colour can be switched off for pipes and tests.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use noderunner_nav::domain::entity::{ActorKind, ProfileKind};
use noderunner_nav::domain::hint::Hint;
use noderunner_nav::domain::target::{Target, TargetKind};
use noderunner_nav::domain::tile::Tile;
use noderunner_nav::Board;

pub struct Report<W: Write> {
    out: W,
    color: bool,
}

fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Empty => Color::DarkGrey,
        Tile::Brick => Color::DarkRed,
        Tile::Ladder => Color::Yellow,
        Tile::Rope => Color::DarkYellow,
        Tile::Gift => Color::Magenta,
        Tile::PlayerSpawn => Color::Green,
        Tile::HostileSpawn => Color::Red,
    }
}

fn hint_color(symbol: char) -> Color {
    match symbol {
        '@' => Color::Green,
        '?' => Color::DarkGrey,
        'X' => Color::Red,
        'F' => Color::Cyan,
        _ => Color::White,
    }
}

fn kind_label(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Platform => "platform",
        TargetKind::Rope => "rope",
        TargetKind::Ladder => "ladder",
        TargetKind::Gift => "gift",
    }
}

impl<W: Write> Report<W> {
    pub fn new(out: W, color: bool) -> Self {
        Report { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            queue!(self.out, Print(text))
        }
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text), Print("\n"))
    }

    /// Header, map, targets, actors, then both hint fields per target.
    pub fn board(&mut self, board: &Board) -> io::Result<()> {
        self.line(&format!(
            "== {} ({}x{}, {} targets, {} gifts) ==",
            board.name(), board.width(), board.height(),
            board.targets().len(), board.remaining_gifts(),
        ))?;
        self.terrain(board)?;
        self.regeneration(board)?;
        self.line("")?;

        for target in board.targets().iter() {
            self.target_line(target)?;
        }
        for actor in board.actors() {
            let label = match actor.kind {
                ActorKind::Player => "player",
                ActorKind::Hostile => "hostile",
            };
            let hint = board.hint_for_actor(actor.id);
            self.line(&format!("  {label:<8} ({:>2},{:>2}) next {}", actor.x, actor.y, hint.symbol()))?;
        }

        for target in board.targets().active() {
            self.line("")?;
            self.target_line(target)?;
            self.hint_fields(board, target)?;
        }
        self.out.flush()
    }

    fn terrain(&mut self, board: &Board) -> io::Result<()> {
        for y in 0..board.height() {
            for x in 0..board.width() {
                let tile = board.tile_type(x, y);
                let ch = if board.is_tile_visible(x, y) { tile.symbol() } else { '.' };
                self.colored(tile_color(tile), &ch.to_string())?;
            }
            self.line("")?;
        }
        Ok(())
    }

    fn regeneration(&mut self, board: &Board) -> io::Result<()> {
        self.line(&format!("tick {}, bricks regenerate after {} ticks", board.now(), board.regen_ticks()))?;
        for (x, y) in board.broken_bricks() {
            if let Some(at) = board.regenerates_at(x, y) {
                self.line(&format!("  broken   ({x:>2},{y:>2}) back at tick {at}"))?;
            }
        }
        Ok(())
    }

    fn target_line(&mut self, target: &Target) -> io::Result<()> {
        let state = if target.active { "" } else { " (collected)" };
        self.line(&format!(
            "  #{:<3} {:<8} ({:>2},{:>2}){state}",
            target.id.index(), kind_label(target.kind), target.x, target.y,
        ))
    }

    /// Careful and reckless fields side by side.
    fn hint_fields(&mut self, board: &Board, target: &Target) -> io::Result<()> {
        let gap = " ".repeat(3);
        let blank = vec![Hint::Unknown.symbol().to_string().repeat(board.width()); board.height()];
        let [careful, reckless] = [ProfileKind::Careful, ProfileKind::Reckless].map(|kind| {
            board.hints(kind).get(target.id).map_or_else(|| blank.clone(), |m| m.render_rows())
        });

        for (left, right) in careful.iter().zip(&reckless) {
            for row in [left, right] {
                for ch in row.chars() {
                    self.colored(hint_color(ch), &ch.to_string())?;
                }
                queue!(self.out, Print(&gap))?;
            }
            self.line("")?;
        }
        Ok(())
    }
}
