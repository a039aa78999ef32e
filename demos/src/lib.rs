//! Cave walk: the game model behind the `cave` demo.
//!
//! Demonstrates: a [`TileSet`] filled from a carved cave, tiles revealed as
//! the player explores, a camera that re-centres on every step, goblins
//! drawn as entities on top of the grid, and live tile-size changes.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use transience_core::{Color, Glyph, Grid, GridError, Point};
use transience_view::{
    Entity, FontCache, Logical, PixelCanvas, Resolution, Sprite, TileSet, TileSetConfig,
};

// Colours
const COL_BG: Color = Color::from_rgb(16, 16, 24);
const COL_WALL: Color = Color::from_rgb(110, 110, 140);
const COL_FLOOR: Color = Color::from_rgb(70, 64, 58);
const COL_PLAYER: Color = Color::from_rgb(255, 220, 80);
const COL_GOBLIN: Color = Color::from_rgb(80, 200, 200);

/// Percent chance per turn that a new goblin appears.
const GOBLIN_SPAWN_CHANCE: u32 = 5;

/// Settings for the cave demo.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub title: String,
    pub map_width: i32,
    pub map_height: i32,
    pub pixels_per_tile: u32,
    /// Goblins placed when a level is generated.
    pub goblins: usize,
    /// Upper bound on goblins alive at once.
    pub max_goblins: usize,
    /// Chebyshev radius around the player that gets revealed.
    pub reveal_radius: i32,
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "transience cave".into(),
            map_width: 120,
            map_height: 80,
            pixels_per_tile: 32,
            goblins: 6,
            max_goblins: 20,
            reveal_radius: 6,
            seed: 42,
        }
    }
}

/// What a key press asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(i32, i32),
    ZoomIn,
    ZoomOut,
    Regenerate,
    Quit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Terrain {
    #[default]
    Wall,
    Floor,
}

fn terrain_glyph(t: Terrain) -> Glyph {
    match t {
        Terrain::Wall => Glyph::new('#', COL_WALL, COL_BG),
        Terrain::Floor => Glyph::new('.', COL_FLOOR, COL_BG),
    }
}

/// Carve a connected cave by random walk from the centre until `fraction`
/// of the map is floor.
fn carve_cave(width: i32, height: i32, fraction: f32, rng: &mut StdRng) -> Result<Grid<Terrain>, GridError> {
    let mut map = Grid::new();
    map.set_dimensions(width, height)?;
    let interior = ((width - 2).max(1) * (height - 2).max(1)) as f32;
    let wanted = (interior * fraction) as usize;
    let mut p = Point::new(width / 2, height / 2);
    let mut carved = 0;
    let mut steps = 0;
    while carved < wanted && steps < wanted * 50 {
        if let Some(t) = map.try_get_mut(p) {
            if *t == Terrain::Wall {
                *t = Terrain::Floor;
                carved += 1;
            }
        }
        let (dx, dy) = match rng.random_range(0..4u32) {
            0 => (1, 0),
            1 => (-1, 0),
            2 => (0, 1),
            _ => (0, -1),
        };
        let next = p.shift(dx, dy);
        if next.x > 0 && next.y > 0 && next.x < width - 1 && next.y < height - 1 {
            p = next;
        }
        steps += 1;
    }
    Ok(map)
}

/// The cave demo state.
pub struct CaveGame {
    config: DemoConfig,
    map: Grid<Terrain>,
    tiles: TileSet,
    player: Sprite,
    goblins: Vec<Sprite>,
    rng: StdRng,
    screen: Resolution,
}

impl CaveGame {
    pub fn new(
        config: DemoConfig,
        fonts: Rc<RefCell<FontCache>>,
        screen: Resolution,
    ) -> Result<Self, GridError> {
        let tiles = TileSet::with_config(
            config.map_width,
            config.map_height,
            fonts,
            TileSetConfig {
                pixels_per_tile: config.pixels_per_tile,
                tile: terrain_glyph(Terrain::Wall),
                ..Default::default()
            },
        )?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let map = carve_cave(config.map_width, config.map_height, 0.4, &mut rng)?;
        let mut game = Self {
            config,
            map,
            tiles,
            player: Sprite::new(Point::ZERO, Glyph::new('@', COL_PLAYER, COL_BG)),
            goblins: Vec::new(),
            rng,
            screen,
        };
        game.start_level();
        Ok(game)
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn player(&self) -> Point {
        self.player.pos
    }

    pub fn goblins(&self) -> impl Iterator<Item = Point> + '_ {
        self.goblins.iter().map(|g| g.pos)
    }

    pub fn is_floor(&self, p: Point) -> bool {
        self.map.try_get(p) == Some(&Terrain::Floor)
    }

    /// Copy the map into the tiles, hide everything, place the player and
    /// goblins and snap the camera onto the player.
    fn start_level(&mut self) {
        let map = &self.map;
        self.tiles.tiles_mut().for_each(|p, tile| {
            let terrain = map.try_get(p).copied().unwrap_or_default();
            let glyph = tile.glyph_mut();
            let fresh = terrain_glyph(terrain);
            glyph.ch = fresh.ch;
            glyph.fg = fresh.fg;
            glyph.bg = fresh.bg;
            tile.hide();
        });

        self.player.pos = self.random_floor().unwrap_or(Point::ZERO);
        self.goblins.clear();
        for _ in 0..self.config.goblins {
            self.spawn_goblin();
        }

        let centre = self.player.pos - self.screen.in_tiles(self.tiles.pixels_per_tile()) / 2;
        self.tiles.position_mut().jump_to(centre);
        self.tiles.set_pixel_perfect(self.screen);
        self.reveal();
    }

    fn random_floor(&mut self) -> Option<Point> {
        for _ in 0..10_000 {
            let p = Point::new(
                self.rng.random_range(0..self.config.map_width),
                self.rng.random_range(0..self.config.map_height),
            );
            if self.is_floor(p) {
                return Some(p);
            }
        }
        None
    }

    fn occupied(&self, p: Point) -> bool {
        self.player.pos == p || self.goblins.iter().any(|g| g.pos == p)
    }

    fn spawn_goblin(&mut self) {
        if self.goblins.len() >= self.config.max_goblins {
            return;
        }
        if let Some(p) = self.random_floor() {
            if !self.occupied(p) && p.chebyshev(self.player.pos) > 2 {
                self.goblins
                    .push(Sprite::new(p, Glyph::new('G', COL_GOBLIN, COL_BG)));
            }
        }
    }

    /// Show every tile within the reveal radius of the player.
    fn reveal(&mut self) {
        let r = self.config.reveal_radius;
        let origin = self.player.pos;
        for dy in -r..=r {
            for dx in -r..=r {
                self.tiles.show_tile(origin.shift(dx, dy));
            }
        }
    }

    /// Move the player by one step. Walls and goblins block.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let to = self.player.pos.shift(dx, dy);
        if !self.is_floor(to) || self.goblins.iter().any(|g| g.pos == to) {
            return false;
        }
        self.player.pos = to;
        self.reveal();
        self.tiles.center_on(to, self.screen);
        true
    }

    /// Goblins wander one random step; now and then a new one appears.
    fn end_turn(&mut self) {
        for i in 0..self.goblins.len() {
            let (dx, dy) = match self.rng.random_range(0..5u32) {
                0 => (1, 0),
                1 => (-1, 0),
                2 => (0, 1),
                3 => (0, -1),
                _ => (0, 0),
            };
            let to = self.goblins[i].pos.shift(dx, dy);
            if self.is_floor(to) && !self.occupied(to) {
                self.goblins[i].pos = to;
            }
        }
        if self.rng.random_range(0..100u32) < GOBLIN_SPAWN_CHANCE {
            self.spawn_goblin();
        }
    }

    /// Apply an action. Returns `false` when the demo should quit.
    pub fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Move(dx, dy) => {
                if self.try_move(dx, dy) {
                    self.end_turn();
                }
            }
            Action::ZoomIn => self.zoom(self.tiles.pixels_per_tile() + 8),
            Action::ZoomOut => self.zoom(self.tiles.pixels_per_tile().saturating_sub(8)),
            Action::Regenerate => {
                match carve_cave(self.config.map_width, self.config.map_height, 0.4, &mut self.rng) {
                    Ok(map) => {
                        self.map = map;
                        self.start_level();
                    }
                    Err(e) => log::warn!("cave regeneration failed: {e}"),
                }
            }
            Action::Quit => return false,
        }
        true
    }

    fn zoom(&mut self, pixels_per_tile: u32) {
        self.tiles.set_pixels_per_tile(pixels_per_tile);
        self.tiles.center_on(self.player.pos, self.screen);
    }

    /// The window changed size.
    pub fn resize(&mut self, screen: Resolution) {
        self.screen = screen;
        self.tiles.set_pixel_perfect(screen);
        self.tiles.center_on(self.player.pos, screen);
    }

    pub fn render(&self, canvas: &mut PixelCanvas) {
        canvas.clear(COL_BG);
        let mut entities: Vec<&dyn Entity> = Vec::with_capacity(self.goblins.len() + 1);
        entities.push(&self.player);
        entities.extend(self.goblins.iter().map(|g| g as &dyn Entity));
        self.tiles.render(&entities, canvas, self.screen);
    }
}

impl Logical for CaveGame {
    fn update(&mut self, elapsed_ms: u32) {
        self.tiles.update(elapsed_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Resolution = Resolution::new(640, 480);

    fn game() -> CaveGame {
        let fonts = Rc::new(RefCell::new(FontCache::bundled().unwrap()));
        let config = DemoConfig {
            map_width: 40,
            map_height: 30,
            ..Default::default()
        };
        CaveGame::new(config, fonts, SCREEN).unwrap()
    }

    #[test]
    fn carved_cave_has_floor_and_solid_border() {
        let mut rng = StdRng::seed_from_u64(7);
        let map = carve_cave(30, 20, 0.4, &mut rng).unwrap();
        let floors = map.iter().filter(|(_, t)| **t == Terrain::Floor).count();
        assert!(floors >= (28 * 18 * 4 / 10) - 1);
        for (p, t) in map.iter() {
            if p.x == 0 || p.y == 0 || p.x == 29 || p.y == 19 {
                assert_eq!(*t, Terrain::Wall);
            }
        }
    }

    #[test]
    fn player_starts_on_revealed_floor() {
        let g = game();
        assert!(g.is_floor(g.player()));
        let tiles = g.tiles().tiles();
        assert!(tiles.get(g.player()).unwrap().is_visible());
        for (p, tile) in tiles.iter() {
            if p.chebyshev(g.player()) > 6 {
                assert!(!tile.is_visible(), "{p} revealed too early");
            }
        }
    }

    #[test]
    fn walls_block_movement() {
        let mut g = game();
        let start = g.player();
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let to = start.shift(dx, dy);
            let moved = g.try_move(dx, dy);
            if moved {
                assert!(g.is_floor(to));
                assert_eq!(g.player(), to);
                return;
            }
            assert_eq!(g.player(), start);
        }
    }

    #[test]
    fn camera_follows_player() {
        let mut g = game();
        let before = g.tiles().position().target();
        let start = g.player();
        let step = [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .find(|&(dx, dy)| g.is_floor(start.shift(dx, dy)));
        let Some((dx, dy)) = step else { return };
        if g.goblins().any(|p| p == start.shift(dx, dy)) {
            return;
        }
        assert!(g.handle(Action::Move(dx, dy)));
        assert_eq!(g.tiles().position().target(), before.shift(dx, dy));
        for _ in 0..200 {
            g.update(16);
        }
        assert!(g.tiles().position().is_settled());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut g = game();
        for _ in 0..40 {
            g.handle(Action::ZoomIn);
        }
        assert_eq!(g.tiles().pixels_per_tile(), 128);
        for _ in 0..40 {
            g.handle(Action::ZoomOut);
        }
        assert_eq!(g.tiles().pixels_per_tile(), 8);
    }

    #[test]
    fn regenerate_keeps_invariants() {
        let mut g = game();
        assert!(g.handle(Action::Regenerate));
        assert!(g.is_floor(g.player()));
        assert!(g.goblins().all(|p| g.is_floor(p) && p != g.player()));
        assert!(!g.handle(Action::Quit));
    }

    #[test]
    fn renders_player_at_screen_centre() {
        let g = game();
        let mut canvas = PixelCanvas::new(SCREEN.width, SCREEN.height);
        g.render(&mut canvas);
        // 20 x 15 tiles: the player's cell spans the centre pixel.
        let (px, py) = g.tiles().screen_position(g.player());
        assert!(px <= 320.0 && px + 32.0 > 320.0);
        assert!(py <= 240.0 && py + 32.0 > 240.0);

        let (x0, y0) = (px as i32, py as i32);
        let cell: Vec<Color> = (y0..y0 + 32)
            .flat_map(|y| (x0..x0 + 32).map(move |x| (x, y)))
            .filter_map(|(x, y)| canvas.pixel(x, y))
            .collect();
        assert_eq!(cell.len(), 32 * 32);
        assert!(cell.contains(&COL_BG));
        // Only the player's glyph is bright enough in red.
        assert!(cell.iter().any(|c| c.r() > 200), "no '@' ink in the player's cell");
    }
}
