//! Integration tests for paint list construction.

use tern_dom::DomTree;
use tern_layout::{
    ApproximateMetrics, Color, DrawCommand, FontFamily, LayoutTree, PaintList, Viewport, paint,
};

fn paint_html(html: &str) -> (DomTree, LayoutTree, PaintList) {
    let dom = tern_html::parse(html);
    let tree = LayoutTree::layout(&dom, Viewport::default(), &ApproximateMetrics);
    let list = paint(&tree, &dom);
    (dom, tree, list)
}

fn rects(list: &PaintList) -> Vec<&DrawCommand> {
    list.commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Rect { .. }))
        .collect()
}

fn texts(list: &PaintList) -> Vec<&DrawCommand> {
    list.commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Text { .. }))
        .collect()
}

#[test]
fn plain_text_paints_only_text() {
    let (_, _, list) = paint_html("<p>hello world</p>");
    assert!(rects(&list).is_empty());
    let words: Vec<&str> = texts(&list)
        .iter()
        .map(|command| match command {
            DrawCommand::Text { text, .. } => text.as_str(),
            DrawCommand::Rect { .. } => unreachable!(),
        })
        .collect();
    assert_eq!(words, ["hello", "world"]);
}

#[test]
fn nav_links_bar_gets_light_gray_background() {
    let (_, _, list) = paint_html(r#"<nav class="links"><a href="/">home</a></nav>"#);
    let rects = rects(&list);
    assert_eq!(rects.len(), 1);
    match rects[0] {
        DrawCommand::Rect { color, .. } => assert_eq!(*color, Color::LIGHT_GRAY),
        DrawCommand::Text { .. } => unreachable!(),
    }

    // Background first, text on top.
    assert!(matches!(list.commands()[0], DrawCommand::Rect { .. }));
    assert!(
        list.commands()
            .iter()
            .skip(1)
            .any(|command| matches!(command, DrawCommand::Text { .. }))
    );
}

#[test]
fn other_nav_elements_get_no_background() {
    let (_, _, list) = paint_html(r#"<nav class="menu">x</nav>"#);
    assert!(rects(&list).is_empty());
}

#[test]
fn pre_gets_gray_background_and_monospace_text() {
    let (_, tree, list) = paint_html("<pre>let x = 1;</pre>");
    let rects = rects(&list);
    assert_eq!(rects.len(), 1);
    match rects[0] {
        DrawCommand::Rect {
            left,
            top,
            right,
            bottom,
            color,
        } => {
            assert_eq!(*color, Color::GRAY);
            // The background covers the pre box exactly.
            let document = tree.document();
            let html_box = tree.get(document.children[0]);
            let body_box = tree.get(html_box.children[0]);
            let pre_box = tree.get(body_box.children[0]);
            assert!((left - pre_box.x).abs() < 1e-3);
            assert!((top - pre_box.y).abs() < 1e-3);
            assert!((right - (pre_box.x + pre_box.width)).abs() < 1e-3);
            assert!((bottom - (pre_box.y + pre_box.height)).abs() < 1e-3);
        }
        DrawCommand::Text { .. } => unreachable!(),
    }

    for command in texts(&list) {
        match command {
            DrawCommand::Text { font, .. } => assert_eq!(font.family, FontFamily::Monospace),
            DrawCommand::Rect { .. } => unreachable!(),
        }
    }
}

#[test]
fn list_items_get_bullets() {
    let (_, tree, list) = paint_html("<ul><li>one</li><li>two</li></ul>");
    let rects = rects(&list);
    assert_eq!(rects.len(), 2, "one bullet per list item");

    // Bullets sit to the left of the indented content, 4px square,
    // centered on the first line (which is 20px tall here).
    let document = tree.document();
    let html_box = tree.get(document.children[0]);
    let body_box = tree.get(html_box.children[0]);
    let ul_box = tree.get(body_box.children[0]);
    let li_box = tree.get(ul_box.children[0]);

    match rects[0] {
        DrawCommand::Rect {
            left,
            top,
            right,
            bottom,
            color,
        } => {
            assert_eq!(*color, Color::BLACK);
            assert!((left - (li_box.x - 13.0 - 2.0)).abs() < 1e-3);
            assert!((right - left - 4.0).abs() < 1e-3);
            assert!((bottom - top - 4.0).abs() < 1e-3);
            assert!((top - (li_box.y + 10.0 - 2.0)).abs() < 1e-3);
        }
        DrawCommand::Text { .. } => unreachable!(),
    }
}

#[test]
fn text_commands_expose_a_vertical_extent() {
    let (_, _, list) = paint_html("<p>word</p>");
    for command in texts(&list) {
        // linespace at size 16 with the approximate metrics is 19.2
        assert!((command.bottom() - command.top() - 19.2).abs() < 1e-3);
    }
}

#[test]
fn visible_filters_by_scroll_window() {
    let mut list = PaintList::new();
    for line in 0..10 {
        let top = line as f32 * 100.0;
        list.push(DrawCommand::Rect {
            left: 0.0,
            top,
            right: 10.0,
            bottom: top + 50.0,
            color: Color::BLACK,
        });
    }

    // Window [250, 550]: extents 200..250 (touches at 250), 300..350,
    // 400..450, and 500..550 intersect.
    let visible: Vec<_> = list.visible(250.0, 300.0).collect();
    assert_eq!(visible.len(), 4);
    assert!((visible[0].top() - 200.0).abs() < 1e-3);
    assert!((visible[3].top() - 500.0).abs() < 1e-3);

    // Scrolled to the top, only the first few show.
    let at_top: Vec<_> = list.visible(0.0, 120.0).collect();
    assert_eq!(at_top.len(), 2);
}
