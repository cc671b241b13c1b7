use bevy::prelude::*;

use crate::constants::{COURT_FEET_HEIGHT, COURT_FEET_WIDTH, COURT_PIXEL_WIDTH};

/// Court rectangle in pixel space. x runs left-to-right toward the offensive
/// basket on the right baseline; y runs bottom-to-top. The origin is the
/// bottom-left corner of the playing surface.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CourtDims {
    pub width: f32,
    pub height: f32,
}

impl Default for CourtDims {
    fn default() -> Self {
        Self {
            width: COURT_PIXEL_WIDTH,
            height: COURT_PIXEL_WIDTH * COURT_FEET_HEIGHT / COURT_FEET_WIDTH,
        }
    }
}

impl CourtDims {
    /// Convert an officiating distance in feet into pixels.
    pub fn ft(&self, feet: f32) -> f32 {
        feet / COURT_FEET_WIDTH * self.width
    }

    pub fn half_court_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Offensive basket, 4 ft in from the right baseline.
    pub fn basket(&self) -> Vec2 {
        Vec2::new(self.width - self.ft(4.0), self.height / 2.0)
    }

    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Clamp with an inset margin so a marker of the given radius stays
    /// fully inside the boundary.
    pub fn clamp_inset(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(margin, self.width - margin),
            p.y.clamp(margin, self.height - margin),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Frontcourt lane: 19 ft deep from the right baseline, 16 ft wide,
    /// centered on the basket.
    pub fn paint_min_x(&self) -> f32 {
        self.width - self.ft(19.0)
    }

    pub fn paint_half_height(&self) -> f32 {
        self.ft(8.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Paint,
    Perimeter,
    Backcourt,
    CornerLeft,
    CornerRight,
    CenterCircle,
}

/// Coarse side classification driven by the ball's x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallSide {
    /// Within 25 ft of the offensive baseline.
    DeepBallSide,
    /// Frontcourt, but not deep.
    BallSide,
    /// Backcourt.
    Transition,
}

/// Which vertical half of the court the ball occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalHalf {
    Upper,
    Lower,
}

impl VerticalHalf {
    pub fn of(y: f32, dims: &CourtDims) -> Self {
        if y >= dims.height / 2.0 {
            VerticalHalf::Upper
        } else {
            VerticalHalf::Lower
        }
    }

    /// +1 toward the upper sideline, -1 toward the lower.
    pub fn sign(self) -> f32 {
        match self {
            VerticalHalf::Upper => 1.0,
            VerticalHalf::Lower => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            VerticalHalf::Upper => VerticalHalf::Lower,
            VerticalHalf::Lower => VerticalHalf::Upper,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub zone: Zone,
    pub side: BallSide,
}

pub fn ball_side(ball_x: f32, dims: &CourtDims) -> BallSide {
    if ball_x > dims.width - dims.ft(25.0) {
        BallSide::DeepBallSide
    } else if ball_x > dims.half_court_x() {
        BallSide::BallSide
    } else {
        BallSide::Transition
    }
}

/// Classify the ball position into a discrete zone and side. Pure function
/// of the coordinates and the static court dimensions.
///
/// Precedence: Paint > Corner > CenterCircle > Backcourt > Perimeter.
/// Corners only exist in the deep zone near the offensive baseline, in the
/// outer 30% band along either sideline.
pub fn classify(ball: Vec2, dims: &CourtDims) -> Classification {
    let side = ball_side(ball.x, dims);

    let in_paint = ball.x >= dims.paint_min_x()
        && (ball.y - dims.height / 2.0).abs() <= dims.paint_half_height();

    let deep_x = ball.x > dims.width - dims.ft(25.0);
    let in_corner_left = deep_x && ball.y > dims.height * 0.7;
    let in_corner_right = deep_x && ball.y < dims.height * 0.3;

    let in_center_circle = ball.distance(dims.center()) <= dims.ft(6.0);

    let zone = if in_paint {
        Zone::Paint
    } else if in_corner_left {
        Zone::CornerLeft
    } else if in_corner_right {
        Zone::CornerRight
    } else if in_center_circle {
        Zone::CenterCircle
    } else if ball.x < dims.half_court_x() {
        Zone::Backcourt
    } else {
        Zone::Perimeter
    };

    Classification { zone, side }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> CourtDims {
        CourtDims::default()
    }

    #[test]
    fn classification_is_deterministic() {
        let d = dims();
        let points = [
            Vec2::new(10.0, 10.0),
            Vec2::new(d.width / 2.0, d.height / 2.0),
            Vec2::new(d.width - d.ft(2.0), d.height - d.ft(2.0)),
            Vec2::new(d.width - d.ft(10.0), d.height / 2.0),
        ];
        for p in points {
            assert_eq!(classify(p, &d), classify(p, &d));
        }
    }

    #[test]
    fn paint_beats_corner_and_perimeter() {
        let d = dims();
        // Dead center of the lane
        let p = Vec2::new(d.width - d.ft(10.0), d.height / 2.0);
        assert_eq!(classify(p, &d).zone, Zone::Paint);
    }

    #[test]
    fn corners_need_deep_x_and_outer_band() {
        let d = dims();
        let upper = Vec2::new(d.width - d.ft(5.0), d.height * 0.9);
        let lower = Vec2::new(d.width - d.ft(5.0), d.height * 0.1);
        assert_eq!(classify(upper, &d).zone, Zone::CornerLeft);
        assert_eq!(classify(lower, &d).zone, Zone::CornerRight);

        // Same band but shallow x is just perimeter
        let shallow = Vec2::new(d.half_court_x() + d.ft(5.0), d.height * 0.9);
        assert_eq!(classify(shallow, &d).zone, Zone::Perimeter);
    }

    #[test]
    fn backcourt_is_left_of_half_court() {
        let d = dims();
        let p = Vec2::new(d.ft(10.0), d.height * 0.5);
        let c = classify(p, &d);
        assert_eq!(c.zone, Zone::Backcourt);
        assert_eq!(c.side, BallSide::Transition);
    }

    #[test]
    fn center_circle_at_mid_court() {
        let d = dims();
        let p = d.center() + Vec2::new(d.ft(2.0), 0.0);
        assert_eq!(classify(p, &d).zone, Zone::CenterCircle);
    }

    #[test]
    fn ball_side_thresholds() {
        let d = dims();
        assert_eq!(ball_side(d.width - d.ft(10.0), &d), BallSide::DeepBallSide);
        assert_eq!(ball_side(d.half_court_x() + d.ft(2.0), &d), BallSide::BallSide);
        assert_eq!(ball_side(d.ft(10.0), &d), BallSide::Transition);
    }

    #[test]
    fn vertical_half_sign_and_opposite() {
        let d = dims();
        assert_eq!(VerticalHalf::of(d.height * 0.9, &d), VerticalHalf::Upper);
        assert_eq!(VerticalHalf::of(d.height * 0.1, &d), VerticalHalf::Lower);
        assert_eq!(VerticalHalf::Upper.opposite(), VerticalHalf::Lower);
        assert_eq!(VerticalHalf::Upper.sign(), 1.0);
        assert_eq!(VerticalHalf::Lower.sign(), -1.0);
    }
}
