use std::convert::TryFrom;

use crate::color::Color;
use crate::tuple::Tuple3D;

/// A material record.
///
/// Materials use coefficients from the Phong reflection model. Each
/// coefficient is a color, so a surface can respond differently per channel.
/// `reflective` scales the color seen in the mirror direction; a black
/// `reflective` means no reflection rays are cast at all.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub specular_power: f64,
    pub reflective: Color,
}

/// The default material is black in every term, with a specular power of 1.
impl Default for Material {
    fn default() -> Material {
        Material {
            ambient: Color::black(),
            diffuse: Color::black(),
            specular: Color::black(),
            specular_power: 1.0,
            reflective: Color::black(),
        }
    }
}

/// How a point light dims with distance.
///
/// The intensity reaching a point is divided by `distance^exponent`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Falloff {
    None,
    Linear,
    Quadratic,
}

impl Default for Falloff {
    fn default() -> Falloff {
        Falloff::None
    }
}

impl Falloff {
    pub fn exponent(&self) -> i32 {
        match self {
            Falloff::None => 0,
            Falloff::Linear => 1,
            Falloff::Quadratic => 2,
        }
    }

    /// The fraction of a light's intensity left after `distance`.
    pub fn attenuation(&self, distance: f64) -> f64 {
        match self {
            Falloff::None => 1.0,
            _ => 1.0 / distance.powi(self.exponent()),
        }
    }
}

impl TryFrom<u8> for Falloff {
    type Error = String;

    fn try_from(exponent: u8) -> Result<Falloff, String> {
        match exponent {
            0 => Ok(Falloff::None),
            1 => Ok(Falloff::Linear),
            2 => Ok(Falloff::Quadratic),
            n => Err(format!("invalid falloff {}, expected 0, 1 or 2", n)),
        }
    }
}

/// A light source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightSource {
    /// Light arriving equally everywhere; never shadowed.
    Ambient { color: Color },

    /// Light from infinitely far away, travelling along `direction`.
    ///
    /// `direction` is unit length.
    Directional { direction: Tuple3D, color: Color },

    /// Light radiating from `position`.
    Point { position: Tuple3D, color: Color, falloff: Falloff },
}

/// How light from one source arrives at a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Incidence {
    /// Unit vector from the point toward the light.
    pub direction: Tuple3D,

    /// Distance to the light, infinite for directional lights.
    pub distance: f64,

    /// Fraction of the light's color which reaches the point.
    pub attenuation: f64,
}

impl LightSource {
    pub fn ambient(color: Color) -> LightSource {
        LightSource::Ambient { color }
    }

    /// Creates a directional light. Returns `None` for a zero `direction`.
    pub fn directional(direction: Tuple3D, color: Color) -> Option<LightSource> {
        direction.try_normalize()
            .map(|direction| LightSource::Directional { direction, color })
    }

    pub fn point(position: Tuple3D, color: Color, falloff: Falloff) -> LightSource {
        LightSource::Point { position, color, falloff }
    }

    pub fn color(&self) -> Color {
        match *self {
            LightSource::Ambient { color } => color,
            LightSource::Directional { color, .. } => color,
            LightSource::Point { color, .. } => color,
        }
    }

    /// Computes where this light comes from, as seen from `point`.
    ///
    /// Returns `None` for ambient lights, which have no direction. Also
    /// returns `None` if `point` sits exactly on a point light.
    pub fn incidence(&self, point: Tuple3D) -> Option<Incidence> {
        match *self {
            LightSource::Ambient { .. } => None,
            LightSource::Directional { direction, .. } => Some(Incidence {
                direction: -direction,
                distance: std::f64::INFINITY,
                attenuation: 1.0,
            }),
            LightSource::Point { position, falloff, .. } => {
                let to_light = position - point;
                let distance = to_light.magnitude();
                to_light.try_normalize().map(|direction| Incidence {
                    direction,
                    distance,
                    attenuation: falloff.attenuation(distance),
                })
            }
        }
    }
}

#[test]
fn falloff_from_exponent() {
    assert_eq!(Falloff::try_from(0), Ok(Falloff::None));
    assert_eq!(Falloff::try_from(2), Ok(Falloff::Quadratic));
    assert!(Falloff::try_from(3).is_err());
}

#[test]
fn falloff_attenuation() {
    assert_eq!(Falloff::None.attenuation(4.0), 1.0);
    assert_eq!(Falloff::Linear.attenuation(4.0), 0.25);
    assert_eq!(Falloff::Quadratic.attenuation(4.0), 0.0625);
}

#[test]
fn directional_incidence_points_against_light() {
    let light = LightSource::directional(
        Tuple3D::new(0.0, -2.0, 0.0), Color::white()
    ).unwrap();

    let i = light.incidence(Tuple3D::new(5.0, 5.0, 5.0)).unwrap();
    assert_eq!(i.direction, Tuple3D::new(0.0, 1.0, 0.0));
    assert!(i.distance.is_infinite());
    assert_eq!(i.attenuation, 1.0);
}

#[test]
fn point_incidence() {
    let light = LightSource::point(
        Tuple3D::new(0.0, 0.0, 2.0), Color::white(), Falloff::Quadratic
    );

    let i = light.incidence(Tuple3D::zero()).unwrap();
    assert_eq!(i.direction, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(i.distance, 2.0);
    assert_eq!(i.attenuation, 0.25);

    assert_eq!(light.incidence(Tuple3D::new(0.0, 0.0, 2.0)), None);
}

#[test]
fn zero_directional_light_is_rejected() {
    assert_eq!(LightSource::directional(Tuple3D::zero(), Color::white()), None);
    assert_eq!(LightSource::ambient(Color::white()).incidence(Tuple3D::zero()), None);
}
