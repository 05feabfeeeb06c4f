//! ASCII visualization of a world snapshot.

use textplots::{Chart, Plot, Shape};

use crate::{domain::Polygon, simulator::WorldView};

/// Chart size in braille dots.
const CHART_WIDTH: u32 = 160;
const CHART_HEIGHT: u32 = 80;

/// Draws the outlines of all obstacles, the goal, the car and its rays, framed by the outer
/// edge of the boundary wall.
pub fn render(view: &WorldView) -> String {
    let margin = 2.0 * view.boundary_width;
    let (width, height) = view.region;

    let lines = view
        .obstacles
        .iter()
        .map(|o| o.polygon())
        .chain([view.goal, view.car])
        .flat_map(outline)
        .chain(
            view.rays
                .iter()
                .map(|r| vec![<(f32, f32)>::from(r.start()), r.end().into()]),
        )
        .collect::<Vec<Vec<(f32, f32)>>>();

    plot_line_chart(
        &lines,
        (-margin as f32, (width + margin) as f32),
        (-margin as f32, (height + margin) as f32),
    )
}

fn plot_line_chart(lines: &[Vec<(f32, f32)>], x_range: (f32, f32), y_range: (f32, f32)) -> String {
    let mut chart = Chart::new_with_y_range(
        CHART_WIDTH,
        CHART_HEIGHT,
        x_range.0,
        x_range.1,
        y_range.0,
        y_range.1,
    );
    let chart = chart.lineplot(&Shape::Lines(&[]));
    let shapes = lines.iter().map(|l| Shape::Lines(l)).collect::<Vec<_>>();
    let chart = shapes.iter().fold(chart, |c, s| c.lineplot(s));
    chart.figures();
    chart.to_string()
}

/// Closed polylines of every ring of `polygon`.
fn outline(polygon: &Polygon) -> Vec<Vec<(f32, f32)>> {
    polygon
        .rings()
        .filter(|ring| !ring.is_empty())
        .map(|ring| {
            ring.iter()
                .chain(ring.first())
                .map(|p| <(f32, f32)>::from(*p))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{make_offset_ring, make_rectangle, Angle, Position};

    #[test]
    fn test_outline_closes_rings() {
        let ring = make_offset_ring((10.0, 5.0), 1.0);
        let lines = outline(&ring);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.len(), 5);
            assert_eq!(line.first(), line.last());
        }
        assert_eq!(lines[1][2], (10.0, 5.0));
    }

    #[test]
    fn test_outline_of_rectangle() {
        let rectangle = make_rectangle(Position::new(1.0, 2.0), 2.0, 4.0, Angle::new(0.0));
        assert_eq!(
            outline(&rectangle),
            vec![vec![(3.0, 3.0), (3.0, 1.0), (-1.0, 1.0), (-1.0, 3.0), (3.0, 3.0)]]
        );
    }

    #[test]
    fn test_plot_line_chart_draws_lines() {
        let lines = vec![vec![(0.0, 0.0), (10.0, 10.0)], vec![(0.0, 10.0), (10.0, 0.0)]];
        let chart = plot_line_chart(&lines, (0.0, 10.0), (0.0, 10.0));
        assert!(chart.lines().count() >= (CHART_HEIGHT / 4) as usize);
        assert!(chart.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
    }
}
