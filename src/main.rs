use std::fs::OpenOptions;
use std::io::{Write, stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use cellweave::color::color_level;
use cellweave::tui::alignment::Alignment;
use cellweave::tui::background::Background;
use cellweave::tui::border::{Border, BorderPlacement};
use cellweave::tui::canvas::Canvas;
use cellweave::tui::scroll::VerticalScrollPanel;
use cellweave::tui::stack::VerticalStackPanel;
use cellweave::tui::style::Style;
use cellweave::tui::text::TextBlock;
use cellweave::tui::text_box::TextBox;
use cellweave::tui::wrap::WrapPanel;
use cellweave::{
    Cell, Color, ControlId, DrawingContext, InputEvent, OutputSurface, Rect, Size, TerminalSurface,
};
use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    // Logs go to a file; the terminal is ours to draw on.
    let log_file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open("cellweave.log")?;
    let (log_writer, _guard) = tracing_appender::non_blocking(log_file);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(log_writer)
        .with_ansi(false)
        .init();

    info!("cellweave demo starting, color level {:?}", color_level());

    terminal::enable_raw_mode()?;
    stdout()
        .execute(EnterAlternateScreen)?
        .execute(EnableBracketedPaste)?
        .execute(Hide)?;

    let result = run();

    // Always restore terminal state, even if run() fails
    stdout()
        .execute(Show)?
        .execute(DisableBracketedPaste)?
        .execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    info!("cellweave demo shutting down");
    result
}

/// Controls the main loop touches after the scene is built.
struct Scene {
    root: ControlId,
    counter: ControlId,
    fps: ControlId,
    noise: ControlId,
    outer: ControlId,
    prompt: ControlId,
    scroll: ControlId,
}

fn label(ctx: &mut DrawingContext, text: &str) -> Result<ControlId> {
    Ok(ctx.insert(TextBlock::new(text))?)
}

fn build_scene(ctx: &mut DrawingContext) -> Result<Scene> {
    let counter = ctx.insert(TextBlock::new("Heheszki1").with_color(Color::new(87, 200, 157)))?;
    let counter_border = ctx.insert(
        Border::new(counter).with_placement(BorderPlacement::ALL ^ BorderPlacement::BOTTOM),
    )?;

    let fps = ctx.insert(TextBlock::new("Heheszki2").with_color(Color::new(157, 42, 157)))?;
    let fps_centered = ctx.insert(Alignment::horizontal(fps))?;
    let fps_border = ctx.insert(
        Border::new(fps_centered)
            .with_placement(BorderPlacement::LEFT | BorderPlacement::RIGHT)
            .with_color(Color::new(200, 0, 0)),
    )?;

    let prompt_label = ctx.insert(TextBlock::new(r"D:\test> ").with_color(Color::LIGHT_BLUE))?;
    let prompt = ctx.insert(TextBox::new())?;
    let prompt_row = ctx.insert(WrapPanel::with_children([prompt_label, prompt]))?;

    let test1 = label(ctx, "Test1")?;
    let test2 = label(ctx, "Test2")?;
    let stack = ctx.insert(VerticalStackPanel::with_children([
        test1,
        test2,
        counter_border,
        fps_border,
        prompt_row,
    ]))?;
    let outer = ctx.insert(Border::new(stack).with_color(Color::new(100, 100, 50)))?;

    let styled = label(ctx, "Test")?;
    let styled = ctx.insert(
        Style::new(styled)
            .with_foreground(Color::new(64, 132, 54))
            .with_background(Color::new(65, 31, 64)),
    )?;
    let styled = ctx.insert(Alignment::horizontal(styled))?;
    let filled = ctx.insert(Background::new(
        styled,
        Cell::new('.', Color::new(123, 54, 34), Color::new(65, 25, 235)),
    ))?;
    let filled_border = ctx.insert(Border::new(filled))?;

    let mut lines = Vec::new();
    for i in 1..=15 {
        lines.push(label(ctx, &format!("Test {i}"))?);
    }
    let lines = ctx.insert(VerticalStackPanel::with_children(lines))?;
    let scroll = ctx.insert(VerticalScrollPanel::new(lines))?;
    let scroll_border = ctx.insert(Border::new(scroll))?;

    let noise = ctx.insert(TextBlock::new("Heheszki2").with_color(Color::new(157, 42, 157)))?;
    let mut tiles = Vec::new();
    for i in 1..=3 {
        tiles.push(label(ctx, &format!("Test {i}"))?);
    }
    tiles.push(noise);
    for i in 4..=7 {
        tiles.push(label(ctx, &format!("Test {i}"))?);
    }
    let tiles = ctx.insert(WrapPanel::with_children(tiles))?;
    let tiles_border = ctx.insert(Border::new(tiles))?;

    let root = ctx.insert(Canvas::new())?;
    ctx.add_to_canvas(root, outer, Rect::new(20, 10, 70, 20))?;
    ctx.add_to_canvas(root, filled_border, Rect::new(40, 5, 60, 10))?;
    ctx.add_to_canvas(root, scroll_border, Rect::new(35, 16, 40, 10))?;
    ctx.add_to_canvas(root, tiles_border, Rect::new(5, 5, 10, 15))?;

    Ok(Scene {
        root,
        counter,
        fps,
        noise,
        outer,
        prompt,
        scroll,
    })
}

/// Cheap changing number for the noise label.
fn noise() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::from(elapsed.subsec_nanos()).wrapping_mul(0x9e37_79b9_7f4a_7c15) >> 33)
        .unwrap_or_default()
}

fn run() -> Result<()> {
    let mut surface = TerminalSurface::stdout()?;
    stdout().execute(Clear(ClearType::All))?;
    let mut ctx = DrawingContext::for_surface(&surface);
    let scene = build_scene(&mut ctx)?;
    ctx.set_root(scene.root)?;

    let mut frames = 0u32;
    let mut watch = Instant::now();
    let mut i = 0u64;
    loop {
        ctx.modify::<TextBlock, _>(scene.counter, |text| text.set_text(i.to_string()))?;

        if watch.elapsed() > Duration::from_secs(1) {
            ctx.modify::<TextBlock, _>(scene.fps, |text| text.set_text(frames.to_string()))?;
            ctx.modify::<Border, _>(scene.outer, |border| {
                border.set_placement(border.placement() ^ BorderPlacement::LEFT)
            })?;
            ctx.modify::<TextBlock, _>(scene.noise, |text| text.set_text(noise().to_string()))?;
            watch = Instant::now();
            frames = 0;
        }

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.code == KeyCode::Esc => return Ok(()),
                Event::Key(key) => {
                    let mut input = InputEvent::from(key);
                    ctx.dispatch(&[scene.prompt, scene.scroll], &mut input)?;
                }
                Event::Paste(text) => {
                    for ch in text.chars() {
                        ctx.deliver(scene.prompt, &mut InputEvent::from(KeyCode::Char(ch)))?;
                    }
                }
                Event::Resize(width, height) => {
                    surface.resize(Size::new(width, height));
                    stdout().execute(Clear(ClearType::All))?;
                    ctx.resize(surface.constraint())?;
                }
                _ => {}
            }
        }

        ctx.flush(&mut surface)?;
        stdout().flush()?;
        frames += 1;
        i += 1;
        std::thread::sleep(FRAME);
    }
}
