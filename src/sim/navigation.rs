/// Navigation queries consumed by actor controllers.
///
/// Players read the careful set, hostiles the reckless one. A hostile
/// first looks for a target whose reckless chain from its own cell runs
/// through the player's cell within `width + height` steps; failing that
/// it heads for whatever the player is heading for.

use crate::domain::entity::{ActorId, ActorKind, ProfileKind};
use crate::domain::hint::Hint;
use crate::domain::target::{Target, TargetId};

use super::board::Board;

impl Board {
    /// Active target with the smallest careful distance from (x, y).
    /// Ties go to the earliest target in registry order.
    pub fn nearest_target(&self, x: usize, y: usize) -> Option<&Target> {
        let careful = self.hints(ActorKind::Player.profile());
        let mut best: Option<(&Target, f32)> = None;
        for target in self.targets().active() {
            let d = careful.cell(target.id, x, y).distance;
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((target, d)),
            }
        }
        best.map(|(t, _)| t)
    }

    /// Careful-profile distance from (x, y) to a target; infinite when
    /// unreachable or when the target has no map.
    pub fn distance_to_target(&self, x: usize, y: usize, id: TargetId) -> f32 {
        self.hints(ActorKind::Player.profile()).cell(id, x, y).distance
    }

    /// Next step on one profile toward one target.
    pub fn hint_toward(&self, kind: ProfileKind, x: usize, y: usize, id: TargetId) -> Hint {
        self.hints(kind).cell(id, x, y).hint
    }

    /// Player's next step toward its nearest target.
    pub fn player_hint(&self, x: usize, y: usize) -> Hint {
        match self.nearest_target(x, y) {
            Some(t) => self.hint_toward(ActorKind::Player.profile(), x, y, t.id),
            None => Hint::Hold,
        }
    }

    /// Target a hostile at (hx, hy) commits to, given the observer (the
    /// player) at (ox, oy).
    pub fn hostile_target(&self, hx: usize, hy: usize, ox: usize, oy: usize) -> Option<&Target> {
        let reckless = self.hints(ActorKind::Hostile.profile());
        let bound = self.width() + self.height();

        self.targets()
            .active()
            .find(|t| {
                reckless
                    .get(t.id)
                    .is_some_and(|map| map.walk(hx, hy).take(bound).any(|cell| cell == (ox, oy)))
            })
            .or_else(|| self.nearest_target(ox, oy))
    }

    /// Hostile's next step: the reckless hint toward `hostile_target`.
    pub fn hostile_hint(&self, hx: usize, hy: usize, ox: usize, oy: usize) -> Hint {
        match self.hostile_target(hx, hy, ox, oy) {
            Some(t) => self.hint_toward(ActorKind::Hostile.profile(), hx, hy, t.id),
            None => Hint::Hold,
        }
    }

    /// Hint for a registered actor at its current cell, read from the
    /// hint set of its kind's profile. Hostiles use the player as
    /// observer; without a player they hold.
    pub fn hint_for_actor(&self, id: ActorId) -> Hint {
        let Some(actor) = self.actor(id) else { return Hint::Hold };
        let target = match actor.kind {
            ActorKind::Player => self.nearest_target(actor.x, actor.y),
            ActorKind::Hostile => self
                .player()
                .and_then(|p| self.hostile_target(actor.x, actor.y, p.x, p.y)),
        };
        match target {
            Some(t) => self.hint_toward(actor.kind.profile(), actor.x, actor.y, t.id),
            None => Hint::Hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::NavConfig;
    use crate::domain::entity::ProfileKind;
    use crate::domain::hint::Hint;
    use crate::domain::target::TargetKind;
    use crate::sim::board::Board;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows("nav", rows, &NavConfig::default()).expect("valid board")
    }

    #[test]
    fn nearest_prefers_first_on_tie() {
        // Platform ends at both map sides, equidistant from x = 2.
        let b = board(&["     "]);
        let t = b.nearest_target(2, 0).expect("target");
        assert_eq!((t.x, t.y), (0, 0));
        assert_eq!(b.player_hint(2, 0), Hint::Left);

        let t = b.nearest_target(3, 0).expect("target");
        assert_eq!((t.x, t.y), (4, 0));
        assert_eq!(b.player_hint(3, 0), Hint::Right);
        assert_eq!(b.player_hint(4, 0), Hint::Target);
    }

    #[test]
    fn distance_reads_careful_profile() {
        let b = board(&[" ", "%", " "]);
        let bottom = b.targets().iter().find(|t| t.y == 2).map(|t| t.id).expect("bottom");
        assert!((b.distance_to_target(0, 0, bottom) - 3.9).abs() < 1e-4);
        assert_eq!(b.hint_toward(ProfileKind::Reckless, 0, 0, bottom), Hint::Fall);
        assert!((b.hints(ProfileKind::Reckless).cell(bottom, 0, 0).distance - 48.9).abs() < 1e-3);
    }

    #[test]
    fn collected_gift_is_never_nearest() {
        let mut b = board(&[
            "  @     ",
            "%%%%%%%%",
        ]);
        let gift = b.targets().iter().find(|t| t.kind == TargetKind::Gift).copied().expect("gift");
        assert_eq!(b.nearest_target(2, 0).map(|t| t.id), Some(gift.id));

        assert!(b.collect_gift(2, 0));
        for x in 0..8 {
            assert_ne!(b.nearest_target(x, 0).map(|t| t.id), Some(gift.id));
        }
        // Still excluded after terrain churn.
        b.break_brick(5, 1);
        b.recompute_all();
        assert_ne!(b.nearest_target(2, 0).map(|t| t.id), Some(gift.id));
    }

    #[test]
    fn hold_without_active_targets() {
        let mut b = board(&["%@%"]);
        assert_eq!(b.targets().len(), 1);
        assert_eq!(b.player_hint(1, 0), Hint::Target);

        b.collect_gift(1, 0);
        assert!(b.nearest_target(1, 0).is_none());
        assert_eq!(b.player_hint(1, 0), Hint::Hold);
        assert_eq!(b.hostile_hint(1, 0, 1, 0), Hint::Hold);
    }

    #[test]
    fn hostile_chases_through_player() {
        // Hostile at the left end, player in the middle, gift at the right.
        let b = board(&[
            " #  X  @ ",
            "%%%%%%%%%",
        ]);
        let (hx, hy) = (1, 0);
        let (px, py) = (4, 0);
        // The only chain from (1, 0) that passes (4, 0) heads right.
        assert_eq!(b.hostile_hint(hx, hy, px, py), Hint::Right);
    }

    #[test]
    fn hostile_prefers_registry_order_among_chasing_targets() {
        let b = board(&[
            "         ",
            "%%%%%%%%%",
        ]);
        // Targets: (0, 0) then (8, 0). Observer on the hostile's own cell
        // is crossed by every chain, so the first target wins.
        assert_eq!(b.hostile_hint(4, 0, 4, 0), Hint::Left);
    }

    #[test]
    fn hostile_falls_back_to_player_target() {
        // The hostile's cheapest way down lands straight on (0, 2), so no
        // reckless chain from it crosses the player.
        let b = board(&[
            "#        ",
            "%%%%%%%%%",
            "  X%%%%%%",
            "%%%%%%%%%",
        ]);
        let (px, py) = (2, 2);
        let player_target = b.nearest_target(px, py).expect("player target");
        assert_eq!((player_target.x, player_target.y), (0, 2));
        assert_eq!(b.hostile_target(0, 0, px, py).map(|t| t.id), Some(player_target.id));

        let hint = b.hostile_hint(0, 0, px, py);
        assert_ne!(hint, Hint::Unknown);
        assert_eq!(hint, b.hint_toward(ProfileKind::Reckless, 0, 0, player_target.id));
        assert_eq!(hint, Hint::Fall);
    }

    #[test]
    fn hostile_ignores_stale_map_of_collected_gift() {
        // Only the gift's chain from the hostile at (2, 0) crosses the
        // player at (3, 0); the platform end at (0, 0) lies the other way.
        let mut b = board(&[
            "  #X@%",
            "%%%%%%",
        ]);
        let hostile = b.hostiles().next().map(|a| a.id).expect("hostile");
        let gift = b.targets().iter().find(|t| t.kind == TargetKind::Gift).map(|t| t.id).expect("gift");
        let platform = b.targets().iter().find(|t| (t.x, t.y) == (0, 0)).map(|t| t.id).expect("platform");
        assert_eq!(b.targets().len(), 2);
        assert_eq!(b.hostile_target(2, 0, 3, 0).map(|t| t.id), Some(gift));
        assert_eq!(b.hint_for_actor(hostile), Hint::Right);

        assert!(b.collect_gift(4, 0));
        // Collection does not recompute: the reckless map is still there.
        assert!(b.hints(ProfileKind::Reckless).get(gift).is_some());
        assert_eq!(b.nearest_target(3, 0).map(|t| t.id), Some(platform));
        assert_eq!(b.hostile_target(2, 0, 3, 0).map(|t| t.id), Some(platform));
        assert_eq!(b.hint_for_actor(hostile), Hint::Left);
    }

    #[test]
    fn lookahead_stops_after_width_plus_height_cells() {
        // From (10, 2) the reckless chain to (10, 4) snakes left along the
        // middle floor, drops at column 0 and runs back right: (3, 4) is
        // its 16th cell, (4, 4) its 17th.
        let b = board(&[
            "          H",
            "%%%%%%%%%%H",
            "          H",
            " %%%%%%%%%%",
            "           ",
        ]);
        assert_eq!(b.width() + b.height(), 16);
        let id_at = |x, y| b.targets().iter().find(|t| (t.x, t.y) == (x, y)).map(|t| t.id);
        let far_end = id_at(10, 4).expect("bottom right target");
        let near_end = id_at(0, 4).expect("bottom left target");

        let chased = b.hostile_target(10, 2, 3, 4).map(|t| t.id);
        assert_eq!(chased, Some(far_end));

        // One cell further is out of reach: fall back to the player's own
        // nearest target.
        assert_eq!(b.nearest_target(4, 4).map(|t| t.id), Some(near_end));
        assert_eq!(b.hostile_target(10, 2, 4, 4).map(|t| t.id), Some(near_end));
        assert_eq!(b.hostile_hint(10, 2, 4, 4), Hint::Left);
    }

    #[test]
    fn actor_hints_dispatch_by_kind() {
        let b = board(&[
            "X   #",
            "%%%%%",
        ]);
        let player = b.player().map(|a| a.id).expect("player");
        let hostile = b.hostiles().next().map(|a| a.id).expect("hostile");
        assert_eq!(b.hint_for_actor(player), Hint::Target);
        assert_eq!(b.hint_for_actor(hostile), Hint::Left);
    }
}
