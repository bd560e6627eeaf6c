//! Confetti overlay shown on the thank-you screen.
//!
//! Particles live in a pixel space of 8x16 units per terminal cell and are
//! advanced in fixed 60 Hz frames regardless of how often the event loop
//! ticks. The simulation is local to the screen and ends on its own once
//! every particle has faded or fallen off the bottom edge.

use std::f64::consts::PI;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::canvas::Canvas,
    Frame,
};

const FRAME: Duration = Duration::from_micros(16_667);
const GRAVITY: f64 = 0.15;
const DRAG: f64 = 0.995;
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;
/// Particles below `height + FLOOR_MARGIN` are dropped
const FLOOR_MARGIN: f64 = 40.0;

const INITIAL_BURST: usize = 180;
/// (offset from start, particle count)
const TIMED_BURSTS: [(Duration, usize); 2] = [
    (Duration::from_millis(200), 120),
    (Duration::from_millis(400), 120),
];

const PALETTE: [Color; 6] = [
    Color::Rgb(0x22, 0xc5, 0x5e),
    Color::Rgb(0x3b, 0x82, 0xf6),
    Color::Rgb(0xf5, 0x9e, 0x0b),
    Color::Rgb(0xef, 0x44, 0x44),
    Color::Rgb(0xa8, 0x55, 0xf7),
    Color::Rgb(0x06, 0xb6, 0xd4),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Rect,
    Circle,
}

impl Shape {
    fn glyph(self) -> &'static str {
        match self {
            Shape::Rect => "▪",
            Shape::Circle => "•",
        }
    }
}

#[derive(Debug, Clone)]
struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    rot: f64,
    vr: f64,
    color: Color,
    opacity: f64,
    decay: f64,
    shape: Shape,
}

/// Confetti simulation
#[derive(Debug)]
pub struct Celebration {
    rng: StdRng,
    particles: Vec<Particle>,
    pending_bursts: Vec<(Duration, usize)>,
    elapsed: Duration,
    accumulator: Duration,
    /// Fade-out starts once this much time has passed
    duration: Duration,
    width: f64,
    height: f64,
}

impl Celebration {
    /// Start a celebration over a `cols` x `rows` terminal
    pub fn new(duration: Duration, cols: u16, rows: u16) -> Self {
        Self::with_rng(duration, cols, rows, StdRng::from_entropy())
    }

    /// Deterministic variant for tests
    pub fn with_seed(duration: Duration, cols: u16, rows: u16, seed: u64) -> Self {
        Self::with_rng(duration, cols, rows, StdRng::seed_from_u64(seed))
    }

    fn with_rng(duration: Duration, cols: u16, rows: u16, rng: StdRng) -> Self {
        let mut celebration = Self {
            rng,
            particles: Vec::new(),
            pending_bursts: TIMED_BURSTS.to_vec(),
            elapsed: Duration::ZERO,
            accumulator: Duration::ZERO,
            duration,
            width: 0.0,
            height: 0.0,
        };
        celebration.resize(cols, rows);
        celebration.spawn(INITIAL_BURST);
        celebration
    }

    /// Match the pixel space to the terminal size
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.width = f64::from(cols.max(1)) * CELL_WIDTH;
        self.height = f64::from(rows.max(1)) * CELL_HEIGHT;
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending_bursts.is_empty() && self.particles.is_empty()
    }

    fn spawn(&mut self, count: usize) {
        for _ in 0..count {
            let angle = self.rng.gen_range(-PI..0.0);
            let speed = self.rng.gen_range(4.0..10.0);
            let particle = Particle {
                x: self.rng.gen::<f64>() * self.width,
                y: -20.0,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed + self.rng.gen_range(6.0..10.0),
                rot: self.rng.gen_range(0.0..PI * 2.0),
                vr: self.rng.gen_range(-0.2..0.2),
                color: PALETTE[self.rng.gen_range(0..PALETTE.len())],
                opacity: 1.0,
                decay: self.rng.gen_range(0.002..0.006),
                shape: if self.rng.gen_bool(0.5) {
                    Shape::Rect
                } else {
                    Shape::Circle
                },
            };
            self.particles.push(particle);
        }
    }

    /// Advance by wall-clock `dt`
    pub fn tick(&mut self, dt: Duration) {
        if self.is_finished() {
            return;
        }
        self.accumulator += dt;
        while self.accumulator >= FRAME {
            self.accumulator -= FRAME;
            self.elapsed += FRAME;
            self.fire_due_bursts();
            self.step();
        }
    }

    fn fire_due_bursts(&mut self) {
        let elapsed = self.elapsed;
        let due: usize = self
            .pending_bursts
            .iter()
            .filter(|(at, _)| *at <= elapsed)
            .map(|(_, count)| count)
            .sum();
        self.pending_bursts.retain(|(at, _)| *at > elapsed);
        if due > 0 {
            self.spawn(due);
        }
    }

    fn step(&mut self) {
        let fading = self.elapsed > self.duration;
        let floor = self.height + FLOOR_MARGIN;
        self.particles.retain_mut(|p| {
            p.vy += GRAVITY;
            p.vx *= DRAG;
            p.vy *= DRAG;
            p.x += p.vx;
            p.y += p.vy;
            p.rot += p.vr;
            if fading {
                p.opacity -= p.decay;
            }
            p.opacity > 0.0 && p.y <= floor
        });
    }

    /// Draw the particles over `area`
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.particles.is_empty() {
            return;
        }
        let (width, height) = (self.width, self.height);
        let canvas = Canvas::default()
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for p in &self.particles {
                    if p.x < 0.0 || p.x > width || p.y < 0.0 || p.y > height {
                        continue;
                    }
                    let mut style = Style::default().fg(p.color);
                    if p.opacity < 0.5 {
                        style = style.add_modifier(Modifier::DIM);
                    }
                    ctx.print(p.x, height - p.y, Span::styled(p.shape.glyph(), style));
                }
            });
        frame.render_widget(canvas, area);
    }
}
