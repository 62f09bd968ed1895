use crate::entities::{Body, Entity, GameState, Size};
use crate::world::World;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine, Rectangle},
    },
};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
/// Minimum width kept for the statistics panel.
const PANEL_WIDTH: u16 = 26;
const PROJECTILE_HALF_WIDTH: f64 = 2.0;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub world: &'a World,
    pub fps: u32,
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {
    show_velocity: bool,
}

impl GameRenderer {
    pub fn new(show_velocity: bool) -> Self {
        Self { show_velocity }
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        let canvas = view.world.config().canvas;
        let [game_area, panel_area] = split_area(area, canvas);

        self.render_canvas(frame, game_area, view);
        self.render_panel(frame, panel_area, view);

        if view.game_state == GameState::Paused {
            self.render_paused(frame, game_area);
        }
    }

    /// Draws every active entity, flipped so that canvas y grows downward
    fn render_canvas(&self, frame: &mut Frame, area: Rect, view: &RenderView) {
        let canvas = view.world.config().canvas;
        let world = view.world;
        let game_over = view.game_state == GameState::GameOver;
        let new_high_score = world.stats().new_high_score;
        let show_velocity = self.show_velocity;

        let widget = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, f64::from(canvas.width)])
            .y_bounds([0.0, f64::from(canvas.height)])
            .paint(move |ctx| {
                for entity in world.entities().filter(|e| e.is_active()) {
                    draw_entity(ctx, entity, canvas);
                    if show_velocity {
                        draw_velocity(ctx, entity.body(), canvas);
                    }
                }

                if game_over {
                    draw_game_over(ctx, canvas, new_high_score);
                }
            });

        frame.render_widget(widget, area);
    }

    /// Renders the statistics panel next to the canvas
    fn render_panel(&self, frame: &mut Frame, area: Rect, view: &RenderView) {
        let stats = view.world.stats();
        let health = view.world.player().map_or(0, |p| p.body.health.max(0));
        let label = Style::default().fg(Color::DarkGray);

        let lines = vec![
            Line::from(vec![
                Span::styled("loop count ", label),
                Span::raw(stats.loop_count.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Time alive: ", label),
                Span::styled(
                    stats.time_alive.as_secs().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Enemies Spawned: ", label),
                Span::styled(
                    stats.enemies_spawned.to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(
                    stats.score.to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", label),
                Span::styled(
                    stats.high_score.to_string(),
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("HP: ", label),
                Span::styled(
                    format!("{}%", health),
                    if health > 50 {
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD)
                    } else if health > 25 {
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    },
                ),
            ]),
            Line::from(vec![
                Span::styled("FPS: ", label),
                Span::raw(view.fps.to_string()),
            ]),
            Line::from(""),
            Line::from(Span::styled("[WASD/Arrows: Move]", label)),
            Line::from(Span::styled("[Space: Fire]", label)),
            Line::from(Span::styled("[P: Pause] [Q: Quit]", label)),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Stats ")),
            area,
        );
    }

    /// Renders the pause box over the canvas
    fn render_paused(&self, frame: &mut Frame, area: Rect) {
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let width = area.width.min(24);
        let height = area.height.min(6);
        let pause_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }
}

/// Gives the canvas the widest area that keeps its aspect ratio and leaves room
/// for the panel.
pub fn split_area(area: Rect, canvas: Size) -> [Rect; 2] {
    let ideal = (f32::from(area.height) * canvas.width / canvas.height * CELL_ASPECT).round();
    let max_width = area.width.saturating_sub(PANEL_WIDTH);
    let canvas_width = (ideal as u16).min(max_width).max(1);

    Layout::horizontal([Constraint::Length(canvas_width), Constraint::Min(0)]).areas(area)
}

fn flip(y: f32, canvas: Size) -> f64 {
    f64::from(canvas.height - y)
}

fn draw_entity(ctx: &mut Context, entity: &Entity, canvas: Size) {
    let body = entity.body();
    let x = f64::from(body.position.x);
    let half = body.half_size();
    let (hw, hh) = (f64::from(half.width), f64::from(half.height));
    let y = flip(body.position.y, canvas);

    match entity {
        // Triangle pointing up the screen
        Entity::Player(_) => triangle(
            ctx,
            (x, y + hh),
            (x + hw, y - hh),
            (x - hw, y - hh),
            Color::Green,
        ),
        // Triangle pointing down the screen
        Entity::Enemy(_) => triangle(
            ctx,
            (x, y - hh),
            (x - hw, y + hh),
            (x + hw, y + hh),
            Color::Red,
        ),
        Entity::Projectile(_) => ctx.draw(&Rectangle {
            x: x - PROJECTILE_HALF_WIDTH,
            y: y - hh,
            width: PROJECTILE_HALF_WIDTH * 2.0,
            height: hh * 2.0,
            color: Color::LightBlue,
        }),
    }
}

fn triangle(ctx: &mut Context, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: Color) {
    for (from, to) in [(a, b), (b, c), (c, a)] {
        ctx.draw(&CanvasLine::new(from.0, from.1, to.0, to.1, color));
    }
}

/// A line a tenth as long as the velocity, pointing where the body is going.
fn draw_velocity(ctx: &mut Context, body: &Body, canvas: Size) {
    let x = f64::from(body.position.x);
    let y = flip(body.position.y, canvas);
    ctx.draw(&CanvasLine::new(
        x,
        y,
        x + f64::from(body.velocity.x) / 10.0,
        y - f64::from(body.velocity.y) / 10.0,
        Color::Green,
    ));
}

fn draw_game_over(ctx: &mut Context, canvas: Size, new_high_score: bool) {
    let center_x = f64::from(canvas.width) / 2.0;
    let center_y = f64::from(canvas.height) / 2.0;

    // Text starts at x, so shift it left by roughly half its width
    let chars_to_canvas = f64::from(canvas.width) / 40.0;
    let mut print_centered = |y: f64, line: Line<'static>| {
        let offset = line.width() as f64 * chars_to_canvas / 2.0;
        ctx.print((center_x - offset).max(0.0), y, line);
    };

    print_centered(center_y, Line::from("Game Over").red().bold());
    print_centered(
        center_y - 18.0,
        Line::from("press space to restart").white(),
    );
    if new_high_score {
        print_centered(center_y + 30.0, Line::from("New High Score!").yellow().bold());
    }
}
