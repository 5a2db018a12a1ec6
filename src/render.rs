use anyhow::Result;
use std::path::Path;

use crate::compose::Scene;
use crate::theme::Theme;

pub fn render_svg(scene: &Scene, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = scene.width.max(200.0);
    let height = scene.height.max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    for link in &scene.links {
        let (stroke, stroke_width) = if link.selected {
            (theme.selected_line_color.as_str(), 2.4)
        } else {
            (theme.line_color.as_str(), 1.4)
        };
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            link.x1, link.y1, link.x2, link.y2, stroke, stroke_width
        ));
    }

    for card in &scene.cards {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            card.x,
            card.y,
            card.width,
            card.height,
            card.theme.fill,
            card.theme.border,
            if card.selected { 3.0 } else { 1.4 }
        ));

        if let Some(image) = &card.image {
            let inset = 4.0;
            svg.push_str(&format!(
                "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" href=\"{}\" preserveAspectRatio=\"xMidYMid slice\"/>",
                card.x + inset,
                card.y + card.height - card.width + inset,
                card.width - 2.0 * inset,
                card.width - 2.0 * inset,
                escape_xml(image)
            ));
        }

        let label_x = card.x + card.width / 2.0;
        let label_y = card.y + theme.font_size + 4.0;
        svg.push_str(&format!(
            "<text x=\"{label_x:.2}\" y=\"{label_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.card_text_color,
            escape_xml(&card.name)
        ));

        if let Some(count) = card.log_count {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                card.x + card.width - 6.0,
                card.y + card.height - 6.0,
                theme.font_family,
                theme.font_size * 0.8,
                theme.card_text_color,
                count
            ));
        }
    }

    if let Some(logs) = &scene.log_panel {
        svg.push_str(&log_panel_svg(logs, width, height, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn log_panel_svg(logs: &[String], width: f32, height: f32, theme: &Theme) -> String {
    let line_height = theme.font_size * 1.6;
    let panel_height = (logs.len().max(1) as f32) * line_height + 16.0;
    let panel_y = height - panel_height;
    let mut panel = String::new();
    panel.push_str(&format!(
        "<rect x=\"0\" y=\"{panel_y:.2}\" width=\"{width:.2}\" height=\"{panel_height:.2}\" fill=\"{}\" fill-opacity=\"0.92\"/>",
        theme.panel_background
    ));
    for (idx, log) in logs.iter().enumerate() {
        let text_y = panel_y + 8.0 + (idx as f32 + 1.0) * line_height - theme.font_size * 0.4;
        panel.push_str(&format!(
            "<text x=\"12\" y=\"{text_y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.panel_text_color,
            escape_xml(log)
        ));
    }
    panel
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, scene: &Scene) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(scene.width, scene.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose_scene;
    use crate::graph::test_support::{connection, node_at};
    use crate::graph::{normalized, Graph};
    use crate::layers::MapLayer;
    use crate::prefs::Preferences;
    use crate::selection::SelectionState;

    #[test]
    fn render_svg_basic() {
        let mut hollow = node_at("hollow", MapLayer::Landmark, 0.0, 60.0);
        hollow.name = "Hollow <Spire>".to_string();
        hollow.logs = vec!["first sighting".to_string()];
        let mut cavern = node_at("cavern", MapLayer::Passage, 200.0, 0.0);
        cavern
            .connections
            .push(connection("hollow", "cavern", "hollow", "a narrow way down"));
        let graph = Graph::from_nodes(vec![hollow, cavern]).unwrap();

        let mut selection = SelectionState::new();
        selection.click_node(graph.node("hollow").unwrap());
        let nodes = normalized(graph.nodes());
        let scene = compose_scene(&nodes, &Preferences::default(), &selection).unwrap();
        let svg = render_svg(&scene, &Theme::midnight());

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Hollow &lt;Spire&gt;"));
        assert!(svg.contains("<line"));
        assert!(svg.contains("first sighting"));
    }

    #[test]
    fn no_panel_markup_without_a_selection() {
        let graph =
            Graph::from_nodes(vec![node_at("lone", MapLayer::Other, 0.0, 0.0)]).unwrap();
        let nodes = normalized(graph.nodes());
        let scene =
            compose_scene(&nodes, &Preferences::default(), &SelectionState::new()).unwrap();
        let svg = render_svg(&scene, &Theme::midnight());
        assert!(!svg.contains("fill-opacity"));
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_xml("a & b < c"), "a &amp; b &lt; c");
    }
}
