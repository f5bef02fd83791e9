use std::time::Instant;

use rand::{ Rng, SeedableRng };
use rand_pcg::Pcg64;

use crate::consts::MAX_BOUNCES;
use crate::color::Color;
use crate::canvas::Canvas;
use crate::scene::Scene;

/// How many rays are averaged for each pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// One ray through the center of the pixel.
    Single,

    /// `size * size` rays on a regular grid over the pixel. With `jitter`,
    /// each ray is moved to a random spot inside its grid cell.
    Grid { size: usize, jitter: bool },
}

impl Default for Sampling {
    fn default() -> Sampling {
        Sampling::Single
    }
}

impl Sampling {
    /// Builds a sampling strategy from an optional grid size. A missing or
    /// zero grid means a single sample.
    pub fn from_grid(grid: Option<usize>, jitter: bool) -> Sampling {
        match grid {
            Some(size) if size > 0 => Sampling::Grid { size, jitter },
            _ => Sampling::Single,
        }
    }

    pub fn rays_per_pixel(&self) -> usize {
        match *self {
            Sampling::Single => 1,
            Sampling::Grid { size, .. } => size * size,
        }
    }
}

/// Turns a scene into pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Renderer {
    pub width: usize,
    pub height: usize,
    pub sampling: Sampling,
    pub bounces: usize,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Renderer {
        Renderer {
            width,
            height,
            sampling: Sampling::Single,
            bounces: MAX_BOUNCES,
        }
    }

    pub fn with_sampling(self, sampling: Sampling) -> Renderer {
        Renderer { sampling, ..self }
    }

    pub fn with_bounces(self, bounces: usize) -> Renderer {
        Renderer { bounces, ..self }
    }

    /// Computes the averaged color of one pixel. Row 0 is the top row.
    pub fn sample_pixel<R: Rng>(&self, scene: &Scene, row: usize,
        col: usize, rng: &mut R) -> Color {
        let footprint = scene.camera.footprint(row, col, self.width, self.height);
        let trace = |u: f64, v: f64| {
            let ray = scene.camera.ray_through(footprint.point(u, v));
            scene.world.color_at(&ray, self.bounces)
        };

        match self.sampling {
            Sampling::Single => trace(0.5, 0.5),
            Sampling::Grid { size, jitter } => {
                let cell = 1.0 / size as f64;
                let total: Color = (0..size)
                    .flat_map(|i| (0..size).map(move |j| (i, j)))
                    .map(|(i, j)| {
                        let (du, dv) = if jitter {
                            (rng.gen::<f64>(), rng.gen::<f64>())
                        } else {
                            (0.5, 0.5)
                        };

                        trace((j as f64 + du) * cell, (i as f64 + dv) * cell)
                    })
                    .sum();

                total / (size * size) as f64
            }
        }
    }

    /// Renders every pixel of the scene, drawing jitter from `rng`.
    pub fn render_with<R: Rng>(&self, scene: &Scene, rng: &mut R) -> Canvas {
        let start = Instant::now();
        let mut canvas = Canvas::new(self.width, self.height);

        for row in 0..self.height {
            for col in 0..self.width {
                let color = self.sample_pixel(scene, row, col, rng);
                canvas.write_pixel(col, row, color);
            }

            log::trace!("finished row {} of {}", row + 1, self.height);
        }

        log::info!(
            "rendered {}x{} pixels at {} rays per pixel in {:.2?}",
            self.width, self.height, self.sampling.rays_per_pixel(), start.elapsed()
        );

        canvas
    }
}

/// Renders a scene into `width * height` colors, row-major from the top left.
///
/// `grid` picks a regular `grid * grid` supersampling pattern; `None` casts
/// a single ray through each pixel center. No jitter is applied. Colors are
/// left unclamped.
pub fn render(scene: &Scene, width: usize, height: usize, grid: Option<usize>)
    -> Vec<Color> {
    let mut rng = Pcg64::seed_from_u64(0);
    Renderer::new(width, height)
        .with_sampling(Sampling::from_grid(grid, false))
        .render_with(scene, &mut rng)
        .into_pixels()
}

#[cfg(test)]
use crate::tuple::Tuple3D;
#[cfg(test)]
use crate::shape::Shape;
#[cfg(test)]
use crate::light::{ LightSource, Material };
#[cfg(test)]
use crate::world::World;
#[cfg(test)]
use crate::camera::Camera;
#[cfg(test)]
use crate::index::IndexKind;

/// A white sphere filling the upper half of a default camera's view.
#[cfg(test)]
fn test_scene() -> Scene {
    let material = Material { ambient: Color::white(), ..Material::default() };
    let world = World::new(
        vec![Shape::sphere(Tuple3D::new(0.0, 1.0, -3.0), 1.0).with_material(material)],
        vec![LightSource::ambient(Color::gray(0.5))],
        IndexKind::BoundingBoxes,
    );

    Scene::new(world, Camera::default())
}

#[test]
fn render_produces_row_major_pixels() {
    let pixels = render(&test_scene(), 4, 4, None);
    assert_eq!(pixels.len(), 16);

    // The sphere sits above the view axis, so it shows on the top rows.
    assert_eq!(pixels[1], Color::gray(0.5));
    assert_eq!(pixels[2], Color::gray(0.5));
    assert_eq!(pixels[13], Color::black());
    assert_eq!(pixels[14], Color::black());
}

#[test]
fn grid_of_one_matches_single_sample() {
    let scene = test_scene();
    let single = render(&scene, 8, 8, None);
    let grid = render(&scene, 8, 8, Some(1));

    assert_eq!(single, grid);
}

#[test]
fn seeded_jitter_is_repeatable() {
    let scene = test_scene();
    let renderer = Renderer::new(6, 6)
        .with_sampling(Sampling::Grid { size: 3, jitter: true });

    let first = renderer.render_with(&scene, &mut Pcg64::seed_from_u64(7));
    let second = renderer.render_with(&scene, &mut Pcg64::seed_from_u64(7));
    assert_eq!(first, second);
}

#[test]
fn supersampled_edge_pixels_are_blended() {
    let scene = test_scene();
    let renderer = Renderer::new(4, 4)
        .with_sampling(Sampling::Grid { size: 4, jitter: false });
    let canvas = renderer.render_with(&scene, &mut Pcg64::seed_from_u64(0));

    let values: Vec<f64> = canvas.pixels().iter().map(|c| c.r).collect();
    assert!(values.iter().all(|&v| v >= 0.0 && v <= 0.5 + 1e-9));
    assert!(values.iter().any(|&v| v > 0.0 && v < 0.5));
}

#[test]
fn sampling_from_grid() {
    assert_eq!(Sampling::from_grid(None, true), Sampling::Single);
    assert_eq!(Sampling::from_grid(Some(0), false), Sampling::Single);
    assert_eq!(Sampling::from_grid(Some(3), true), Sampling::Grid { size: 3, jitter: true });
    assert_eq!(Sampling::from_grid(Some(3), true).rays_per_pixel(), 9);
}
