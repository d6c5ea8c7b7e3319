//! 24x24 line-art icons built from embedded-graphics primitives.
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Ellipse, Line, PrimitiveStyle, Rectangle, Triangle};

pub const ICON_SIZE: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Seedling,
    Flame,
    Sparkles,
    Droplet,
    Sun,
    Home,
    Clock,
    Calendar,
}

impl Icon {
    /// Draws the icon with its top-left corner at `origin`. `fg` is the ink
    /// color and `bg` is used for cut-outs.
    pub fn draw<D>(
        self,
        target: &mut D,
        origin: Point,
        fg: BinaryColor,
        bg: BinaryColor,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let mut canvas = target.translated(origin);
        let target = &mut canvas;
        let fill = PrimitiveStyle::with_fill(fg);
        let cut = PrimitiveStyle::with_fill(bg);
        let stroke = PrimitiveStyle::with_stroke(fg, 2);

        match self {
            Icon::Seedling => {
                Line::new(Point::new(12, 22), Point::new(12, 10))
                    .into_styled(stroke)
                    .draw(target)?;
                Ellipse::new(Point::new(1, 7), Size::new(11, 6))
                    .into_styled(fill)
                    .draw(target)?;
                Ellipse::new(Point::new(12, 3), Size::new(11, 6))
                    .into_styled(fill)
                    .draw(target)?;
                Line::new(Point::new(5, 22), Point::new(19, 22))
                    .into_styled(stroke)
                    .draw(target)?;
            }
            Icon::Flame => {
                Circle::new(Point::new(5, 9), 14)
                    .into_styled(fill)
                    .draw(target)?;
                Triangle::new(Point::new(12, 0), Point::new(5, 16), Point::new(19, 16))
                    .into_styled(fill)
                    .draw(target)?;
                Circle::new(Point::new(9, 14), 6)
                    .into_styled(cut)
                    .draw(target)?;
            }
            Icon::Sparkles => {
                star(target, Point::new(9, 14), 9, fill)?;
                star(target, Point::new(19, 5), 4, fill)?;
            }
            Icon::Droplet => {
                Triangle::new(Point::new(12, 1), Point::new(5, 14), Point::new(19, 14))
                    .into_styled(fill)
                    .draw(target)?;
                Circle::new(Point::new(5, 8), 15)
                    .into_styled(fill)
                    .draw(target)?;
            }
            Icon::Sun => {
                Circle::new(Point::new(7, 7), 11)
                    .into_styled(fill)
                    .draw(target)?;
                let rays = [
                    ((12, 0), (12, 3)),
                    ((12, 21), (12, 23)),
                    ((0, 12), (3, 12)),
                    ((21, 12), (23, 12)),
                    ((3, 3), (5, 5)),
                    ((19, 19), (21, 21)),
                    ((3, 21), (5, 19)),
                    ((21, 3), (19, 5)),
                ];
                for ((x0, y0), (x1, y1)) in rays {
                    Line::new(Point::new(x0, y0), Point::new(x1, y1))
                        .into_styled(stroke)
                        .draw(target)?;
                }
            }
            Icon::Home => {
                Triangle::new(Point::new(12, 1), Point::new(0, 12), Point::new(23, 12))
                    .into_styled(fill)
                    .draw(target)?;
                Rectangle::new(Point::new(4, 12), Size::new(16, 11))
                    .into_styled(fill)
                    .draw(target)?;
                Rectangle::new(Point::new(10, 16), Size::new(4, 7))
                    .into_styled(cut)
                    .draw(target)?;
            }
            Icon::Clock => {
                Circle::new(Point::new(1, 1), 22)
                    .into_styled(stroke)
                    .draw(target)?;
                Line::new(Point::new(12, 12), Point::new(12, 5))
                    .into_styled(stroke)
                    .draw(target)?;
                Line::new(Point::new(12, 12), Point::new(17, 12))
                    .into_styled(stroke)
                    .draw(target)?;
            }
            Icon::Calendar => {
                Rectangle::new(Point::new(2, 4), Size::new(20, 19))
                    .into_styled(stroke)
                    .draw(target)?;
                Rectangle::new(Point::new(2, 4), Size::new(20, 6))
                    .into_styled(fill)
                    .draw(target)?;
                Line::new(Point::new(7, 1), Point::new(7, 6))
                    .into_styled(stroke)
                    .draw(target)?;
                Line::new(Point::new(17, 1), Point::new(17, 6))
                    .into_styled(stroke)
                    .draw(target)?;
                for (x, y) in [(6, 13), (11, 13), (16, 13), (6, 17), (11, 17)] {
                    Rectangle::new(Point::new(x, y), Size::new(2, 2))
                        .into_styled(fill)
                        .draw(target)?;
                }
            }
        }
        Ok(())
    }
}

/// Four-pointed star centred on `c`.
fn star<D>(
    target: &mut D,
    c: Point,
    r: i32,
    style: PrimitiveStyle<BinaryColor>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let w = (r / 4).max(1);
    let points = [
        (Point::new(c.x, c.y - r), Point::new(c.x - w, c.y), Point::new(c.x + w, c.y)),
        (Point::new(c.x, c.y + r), Point::new(c.x - w, c.y), Point::new(c.x + w, c.y)),
        (Point::new(c.x - r, c.y), Point::new(c.x, c.y - w), Point::new(c.x, c.y + w)),
        (Point::new(c.x + r, c.y), Point::new(c.x, c.y - w), Point::new(c.x, c.y + w)),
    ];
    for (a, b, d) in points {
        Triangle::new(a, b, d)
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Bitmap;

    const ALL: [Icon; 8] = [
        Icon::Seedling,
        Icon::Flame,
        Icon::Sparkles,
        Icon::Droplet,
        Icon::Sun,
        Icon::Home,
        Icon::Clock,
        Icon::Calendar,
    ];

    #[test]
    fn icons_stay_inside_their_box() {
        for icon in ALL {
            let mut bitmap = Bitmap::new(40, 40);
            icon.draw(&mut bitmap, Point::new(8, 8), BinaryColor::On, BinaryColor::Off).unwrap();

            let total = bitmap.ink_in(0, 0, 40, 40);
            let inside = bitmap.ink_in(8, 8, ICON_SIZE, ICON_SIZE);
            assert!(total > 0, "{icon:?} drew nothing");
            assert_eq!(total, inside, "{icon:?} leaks outside its box");
        }
    }

    #[test]
    fn inverted_icons_use_paper() {
        let mut bitmap = Bitmap::new(24, 24);
        for y in 0..24 {
            for x in 0..24 {
                bitmap.set_ink(x, y, true);
            }
        }
        Icon::Sun.draw(&mut bitmap, Point::zero(), BinaryColor::Off, BinaryColor::On).unwrap();
        assert!(!bitmap.is_ink(12, 12));
        assert!(bitmap.is_ink(0, 0));
        assert!(bitmap.is_ink(23, 0));
    }
}
