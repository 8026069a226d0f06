use cellweave::geometry::Offset;
use cellweave::tui::alignment::Alignment;
use cellweave::tui::background::Background;
use cellweave::tui::border::Border;
use cellweave::tui::canvas::Canvas;
use cellweave::tui::scroll::VerticalScrollPanel;
use cellweave::tui::stack::VerticalStackPanel;
use cellweave::tui::text::TextBlock;
use cellweave::tui::text_box::TextBox;
use cellweave::tui::wrap::WrapPanel;
use cellweave::{
    Cell, Color, Constraint, ControlId, DrawingContext, Error, InputEvent, MemorySurface,
    OutputSurface, Position, Rect, Size,
};
use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;

fn setup(width: u16, height: u16) -> (DrawingContext, MemorySurface) {
    let surface = MemorySurface::new(Size::new(width, height));
    (DrawingContext::for_surface(&surface), surface)
}

fn render(ctx: &mut DrawingContext, surface: &mut MemorySurface) -> Vec<String> {
    ctx.flush(surface).unwrap();
    surface.lines()
}

fn label(ctx: &mut DrawingContext, text: &str) -> ControlId {
    ctx.insert(TextBlock::new(text)).unwrap()
}

fn filled(ctx: &mut DrawingContext, glyph: char) -> ControlId {
    let empty = ctx.insert(Canvas::new()).unwrap();
    ctx.insert(Background::new(
        empty,
        Cell::new(glyph, Color::WHITE, Color::BLACK),
    ))
    .unwrap()
}

fn press(ctx: &mut DrawingContext, order: &[ControlId], code: KeyCode) -> bool {
    let mut event = InputEvent::from(code);
    ctx.dispatch(order, &mut event).unwrap();
    event.handled()
}

#[test]
fn border_frames_its_content() {
    let (mut ctx, mut surface) = setup(4, 3);
    let text = label(&mut ctx, "ab");
    let border = ctx.insert(Border::new(text)).unwrap();
    ctx.set_root(border).unwrap();

    assert_eq!(ctx.tree().size(border), Some(Size::new(4, 3)));
    assert_eq!(render(&mut ctx, &mut surface), vec!["┌──┐", "│ab│", "└──┘"]);
}

#[test]
fn wrap_panel_breaks_rows() {
    let (mut ctx, mut surface) = setup(10, 3);
    let blocks = [
        label(&mut ctx, "aaaa"),
        label(&mut ctx, "bbbb"),
        label(&mut ctx, "cccc"),
    ];
    let wrap = ctx.insert(WrapPanel::with_children(blocks)).unwrap();
    ctx.set_root(wrap).unwrap();

    let origins: Vec<Option<Offset>> = blocks
        .iter()
        .map(|block| ctx.tree().layouts().origin(*block))
        .collect();
    assert_eq!(
        origins,
        vec![
            Some(Offset::new(0, 0)),
            Some(Offset::new(4, 0)),
            Some(Offset::new(0, 1)),
        ]
    );
    assert_eq!(ctx.tree().constraint(wrap).min(), Size::new(4, 2));
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["aaaabbbb  ", "cccc      ", "          "]
    );
}

#[test]
fn scroll_panel_clamps_and_renders_from_top() {
    let (mut ctx, mut surface) = setup(2, 5);
    let rows: Vec<ControlId> = (0..20)
        .map(|i| label(&mut ctx, &format!("{i:02}")))
        .collect();
    let stack = ctx.insert(VerticalStackPanel::with_children(rows)).unwrap();
    let scroll = ctx.insert(VerticalScrollPanel::new(stack)).unwrap();
    ctx.set_root(scroll).unwrap();
    render(&mut ctx, &mut surface);

    for _ in 0..3 {
        assert!(press(&mut ctx, &[scroll], KeyCode::Down));
    }
    let top = |ctx: &DrawingContext| ctx.widget::<VerticalScrollPanel>(scroll).unwrap().top();
    assert_eq!(top(&ctx), 3);
    assert_eq!(render(&mut ctx, &mut surface)[0], "03");

    for _ in 0..30 {
        press(&mut ctx, &[scroll], KeyCode::Down);
    }
    assert_eq!(top(&ctx), 15);
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["15", "16", "17", "18", "19"]
    );
    assert!(!press(&mut ctx, &[scroll], KeyCode::Down));
}

#[test]
fn canvas_paints_later_entries_on_top() {
    let (mut ctx, mut surface) = setup(6, 3);
    let canvas = ctx.insert(Canvas::new()).unwrap();
    let a = filled(&mut ctx, 'a');
    let b = filled(&mut ctx, 'b');
    ctx.add_to_canvas(canvas, a, Rect::new(0, 0, 3, 2)).unwrap();
    ctx.add_to_canvas(canvas, b, Rect::new(2, 1, 3, 2)).unwrap();
    ctx.set_root(canvas).unwrap();
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["aaa   ", "aabbb ", "  bbb "]
    );

    ctx.move_in_canvas(canvas, b, Rect::new(3, 0, 3, 1)).unwrap();
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["aaabbb", "aaa   ", "      "]
    );

    ctx.remove_child(canvas, a).unwrap();
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["   bbb", "      ", "      "]
    );
}

#[test]
fn canvas_rejects_empty_entries() {
    let (mut ctx, _) = setup(6, 3);
    let canvas = ctx.insert(Canvas::new()).unwrap();
    let text = label(&mut ctx, "x");
    let err = ctx
        .add_to_canvas(canvas, text, Rect::new(1, 1, 0, 3))
        .unwrap_err();
    assert!(matches!(err, Error::EmptyCanvasEntry { .. }));
    assert_eq!(ctx.tree().parent(text), None);
}

#[test]
fn updates_from_undisplayed_controls_are_dropped() {
    let (mut ctx, mut surface) = setup(6, 2);
    let shown = label(&mut ctx, "shown");
    let stack = ctx.insert(VerticalStackPanel::with_children([shown])).unwrap();
    ctx.set_root(stack).unwrap();
    render(&mut ctx, &mut surface);

    let loose = label(&mut ctx, "loose");
    ctx.modify::<TextBlock, _>(loose, |text| text.set_text("other"))
        .unwrap();
    ctx.update(loose, Rect::new(0, 0, 5, 1));
    assert_eq!(ctx.damage(), &[] as &[Rect]);

    ctx.remove_child(stack, shown).unwrap();
    ctx.take_damage();
    ctx.modify::<TextBlock, _>(shown, |text| text.set_text("gone!"))
        .unwrap();
    assert_eq!(ctx.damage(), &[] as &[Rect]);
    assert!(!ctx.is_displayed(shown));
}

#[test]
fn removed_controls_stop_resolving() {
    let (mut ctx, _) = setup(6, 2);
    let text = label(&mut ctx, "x");
    ctx.remove(text).unwrap();
    let err = ctx
        .modify::<TextBlock, _>(text, |text| text.set_text("y"))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownControl(id) if id == text));
}

#[test]
fn typing_grows_the_text_box_and_repaints() {
    let (mut ctx, mut surface) = setup(6, 3);
    let text_box = ctx.insert(TextBox::new()).unwrap();
    let border = ctx.insert(Border::new(text_box)).unwrap();
    ctx.set_root(border).unwrap();
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["┌─┐   ", "│ │   ", "└─┘   "]
    );

    assert!(press(&mut ctx, &[text_box], KeyCode::Char('h')));
    assert!(press(&mut ctx, &[text_box], KeyCode::Char('i')));
    assert_eq!(ctx.tree().size(border), Some(Size::new(5, 3)));
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["┌───┐ ", "│hi │ ", "└───┘ "]
    );
    let cursor = surface.cell(Position::new(3, 1)).unwrap();
    assert_eq!(cursor.background, Color::WHITE);

    assert!(press(&mut ctx, &[text_box], KeyCode::Backspace));
    assert_eq!(
        render(&mut ctx, &mut surface),
        vec!["┌──┐  ", "│h │  ", "└──┘  "]
    );
}

#[test]
fn dispatch_stops_at_the_first_listener_that_handles() {
    let (mut ctx, _) = setup(10, 3);
    let text_box = ctx.insert(TextBox::new()).unwrap();
    let rows: Vec<ControlId> = (0..10).map(|_| label(&mut ctx, "row")).collect();
    let stack = ctx.insert(VerticalStackPanel::with_children(rows)).unwrap();
    let scroll = ctx.insert(VerticalScrollPanel::new(stack)).unwrap();
    let column = ctx
        .insert(VerticalStackPanel::with_children([text_box]))
        .unwrap();
    let canvas = ctx.insert(Canvas::new()).unwrap();
    ctx.add_to_canvas(canvas, column, Rect::new(0, 0, 10, 1))
        .unwrap();
    ctx.add_to_canvas(canvas, scroll, Rect::new(0, 1, 10, 2))
        .unwrap();
    ctx.set_root(canvas).unwrap();

    let order = [text_box, scroll];
    assert!(press(&mut ctx, &order, KeyCode::Char('j')));
    assert!(press(&mut ctx, &order, KeyCode::Down));
    assert_eq!(ctx.widget::<TextBox>(text_box).unwrap().text(), "j");
    assert_eq!(ctx.widget::<VerticalScrollPanel>(scroll).unwrap().top(), 1);

    // Labels don't listen; offering them keys is not an error.
    assert!(!press(&mut ctx, &[canvas], KeyCode::Down));
}

#[test]
fn every_control_fits_its_constraint_after_layout() {
    let (mut ctx, _) = setup(30, 12);
    let title = label(&mut ctx, "Title");
    let centered = label(&mut ctx, "mid");
    let centered = ctx.insert(Alignment::horizontal(centered)).unwrap();
    let tiles: Vec<ControlId> = ["one", "two", "three", "four"]
        .iter()
        .map(|word| label(&mut ctx, word))
        .collect();
    let wrap = ctx.insert(WrapPanel::with_children(tiles)).unwrap();
    let lines: Vec<ControlId> = (0..8)
        .map(|i| label(&mut ctx, &format!("line {i}")))
        .collect();
    let lines = ctx.insert(VerticalStackPanel::with_children(lines)).unwrap();
    let scroll = ctx.insert(VerticalScrollPanel::new(lines)).unwrap();
    let stack = ctx
        .insert(VerticalStackPanel::with_children([title, centered, wrap, scroll]))
        .unwrap();
    let border = ctx.insert(Border::new(stack)).unwrap();
    ctx.set_root(border).unwrap();

    let mut pending = vec![border];
    let mut visited = 0;
    while let Some(id) = pending.pop() {
        pending.extend(ctx.tree().get(id).unwrap().children());
        let size = ctx.tree().size(id).unwrap();
        let constraint = ctx.tree().constraint(id);
        assert!(
            constraint.contains(size),
            "{id} at {size:?} outside {constraint:?}"
        );
        visited += 1;
    }
    assert_eq!(visited, 20);
}

#[test]
fn set_content_swaps_and_detaches() {
    let (mut ctx, mut surface) = setup(4, 3);
    let first = label(&mut ctx, "ab");
    let border = ctx.insert(Border::new(first)).unwrap();
    ctx.set_root(border).unwrap();
    render(&mut ctx, &mut surface);

    let second = label(&mut ctx, "cd");
    assert_eq!(ctx.set_content(border, second).unwrap(), first);
    assert_eq!(ctx.tree().parent(first), None);
    assert_eq!(ctx.tree().parent(second), Some(border));
    assert_eq!(render(&mut ctx, &mut surface)[1], "│cd│");
    ctx.remove(first).unwrap();
}

#[test]
fn structural_errors_are_reported() {
    let (mut ctx, _) = setup(4, 3);
    let text = label(&mut ctx, "ab");
    let inner = ctx.insert(VerticalStackPanel::new()).unwrap();
    let outer = ctx
        .insert(VerticalStackPanel::with_children([inner]))
        .unwrap();

    assert!(matches!(
        ctx.modify::<Border, _>(text, |_| ()).unwrap_err(),
        Error::WrongKind { .. }
    ));
    assert!(matches!(
        ctx.set_content(outer, text).unwrap_err(),
        Error::NotAContainer(_)
    ));
    assert!(matches!(
        ctx.push_child(inner, outer).unwrap_err(),
        Error::Cycle { .. }
    ));
    assert!(matches!(
        ctx.push_child(outer, inner).unwrap_err(),
        Error::AlreadyAttached(_)
    ));

    ctx.set_root(outer).unwrap();
    assert!(matches!(
        ctx.remove(outer).unwrap_err(),
        Error::StillAttached(_)
    ));
}

#[test]
fn resize_lays_the_root_out_again() {
    let (mut ctx, _) = setup(10, 2);
    let canvas = ctx.insert(Canvas::new()).unwrap();
    let text = label(&mut ctx, "hello");
    ctx.add_to_canvas(canvas, text, Rect::new(0, 0, 5, 1)).unwrap();
    ctx.set_root(canvas).unwrap();
    assert_eq!(ctx.tree().size(canvas), Some(Size::new(10, 2)));

    let mut smaller = MemorySurface::new(Size::new(4, 2));
    ctx.resize(smaller.constraint()).unwrap();
    assert_eq!(ctx.tree().size(canvas), Some(Size::new(4, 2)));
    assert_eq!(ctx.constraint(), Constraint::fixed(Size::new(4, 2)));
    ctx.flush(&mut smaller).unwrap();
    assert_eq!(smaller.lines(), vec!["hell", "    "]);
}

#[test]
fn unchanged_values_queue_no_damage() {
    let (mut ctx, mut surface) = setup(4, 1);
    let text = label(&mut ctx, "same");
    ctx.set_root(text).unwrap();
    render(&mut ctx, &mut surface);
    let writes = surface.writes();

    ctx.modify::<TextBlock, _>(text, |text| text.set_text("same"))
        .unwrap();
    assert!(ctx.damage().is_empty());
    ctx.flush(&mut surface).unwrap();
    assert_eq!(surface.writes(), writes);
}

#[test]
fn nested_updates_land_at_absolute_clipped_positions() {
    let (mut ctx, _) = setup(20, 8);
    let text_box = ctx.insert(TextBox::new().with_text("ab")).unwrap();
    let mut rows: Vec<ControlId> = (0..4).map(|_| label(&mut ctx, "row")).collect();
    rows.push(text_box);
    let stack = ctx.insert(VerticalStackPanel::with_children(rows)).unwrap();
    let scroll = ctx.insert(VerticalScrollPanel::new(stack)).unwrap();
    let border = ctx.insert(Border::new(scroll)).unwrap();
    let canvas = ctx.insert(Canvas::new()).unwrap();
    ctx.add_to_canvas(canvas, border, Rect::new(2, 1, 10, 4))
        .unwrap();
    ctx.set_root(canvas).unwrap();
    assert_eq!(ctx.tree().size(scroll), Some(Size::new(3, 2)));
    ctx.take_damage();

    // The text box sits on content row 4, below the two visible rows.
    let mut left = InputEvent::from(KeyCode::Left);
    ctx.deliver(text_box, &mut left).unwrap();
    assert!(left.handled());
    assert_eq!(ctx.take_damage(), Vec::<Rect>::new());

    ctx.modify::<VerticalScrollPanel, _>(scroll, |scroll| scroll.set_top(3))
        .unwrap();
    ctx.take_damage();

    let mut left = InputEvent::from(KeyCode::Left);
    ctx.deliver(text_box, &mut left).unwrap();
    assert_eq!(ctx.take_damage(), vec![Rect::new(3, 3, 2, 1)]);
    assert_eq!(
        ctx.cell(Position::new(3, 3)),
        Cell::new('a', Color::BLACK, Color::WHITE)
    );
}
