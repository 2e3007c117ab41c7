use emacs_mini::{
    Config, Coordinator, Motion, Position, Range, RecenterPosition, RevealPlacement,
};

mod support;
use support::mock_host::MockHost;
use support::pump;

fn p(line: u32, col: u32) -> Position {
    Position { line, col }
}

fn host_at_line_five() -> MockHost {
    let text: String = (0..20).map(|i| format!("line {i}\n")).collect();
    let mut host = MockHost::new(&text);
    host.set_cursor(p(5, 2));
    host
}

#[test]
fn test_cycle_visits_center_top_bottom() {
    let mut coord = Coordinator::new();
    let mut host = host_at_line_five();
    let caret = Range::new(p(5, 2), p(5, 2));

    coord.recenter_top_bottom(&mut host).unwrap();
    assert_eq!(host.reveals, vec![(caret, RevealPlacement::Center)]);
    assert_eq!(coord.snapshot().next_recenter, Some(RecenterPosition::Top));

    coord.recenter_top_bottom(&mut host).unwrap();
    assert_eq!(host.reveals.last(), Some(&(caret, RevealPlacement::Top)));
    assert_eq!(coord.snapshot().next_recenter, Some(RecenterPosition::Bottom));

    coord.recenter_top_bottom(&mut host).unwrap();
    assert_eq!(host.reveals.len(), 2);
    assert_eq!(host.page_scrolls, 1);
    assert_eq!(host.cursor(), p(5, 2));
    assert_eq!(coord.snapshot().next_recenter, Some(RecenterPosition::Center));

    coord.recenter_top_bottom(&mut host).unwrap();
    assert_eq!(host.reveals.last(), Some(&(caret, RevealPlacement::Center)));
    assert_eq!(host.reveals.len(), 3);
}

#[test]
fn test_recenter_alone_does_not_reset_cycle() {
    let mut coord = Coordinator::new();
    let mut host = host_at_line_five();

    coord.recenter_top_bottom(&mut host).unwrap();
    pump(&mut coord, &mut host);
    coord.recenter_top_bottom(&mut host).unwrap();

    assert_eq!(host.reveals[1].1, RevealPlacement::Top);
}

#[test]
fn test_selection_change_restarts_cycle() {
    let mut coord = Coordinator::new();
    let mut host = host_at_line_five();

    coord.recenter_top_bottom(&mut host).unwrap();
    coord.recenter_top_bottom(&mut host).unwrap();

    coord.move_cursor(&mut host, Motion::Down).unwrap();
    pump(&mut coord, &mut host);
    assert_eq!(coord.snapshot().next_recenter, Some(RecenterPosition::Center));

    coord.recenter_top_bottom(&mut host).unwrap();
    assert_eq!(
        host.reveals.last(),
        Some(&(Range::new(p(6, 2), p(6, 2)), RevealPlacement::Center))
    );
    assert_eq!(host.page_scrolls, 0);
}

#[test]
fn test_configured_cycle_order() {
    let config = Config::from_toml_str(
        r#"
        [recenter]
        positions = ["top", "bottom"]
        "#,
    )
    .unwrap();
    let mut coord = Coordinator::builder().config(config).build();
    let mut host = host_at_line_five();

    coord.recenter_top_bottom(&mut host).unwrap();
    coord.recenter_top_bottom(&mut host).unwrap();
    coord.recenter_top_bottom(&mut host).unwrap();

    let placements: Vec<_> = host.reveals.iter().map(|(_, placement)| *placement).collect();
    assert_eq!(placements, vec![RevealPlacement::Top, RevealPlacement::Top]);
    assert_eq!(host.page_scrolls, 1);
}

#[test]
fn test_cycles_are_per_editor() {
    let mut coord = Coordinator::new();
    let mut first = MockHost::with_id("a\nb", emacs_mini::EditorId(1));
    let mut second = MockHost::with_id("c\nd", emacs_mini::EditorId(2));

    coord.recenter_top_bottom(&mut first).unwrap();
    coord.recenter_top_bottom(&mut second).unwrap();
    coord.recenter_top_bottom(&mut first).unwrap();

    assert_eq!(second.reveals[0].1, RevealPlacement::Center);
    assert_eq!(first.reveals[1].1, RevealPlacement::Top);
}
