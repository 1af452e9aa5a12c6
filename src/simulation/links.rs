//! Link computation.
//!
//! Pairs are found with a uniform grid whose cell size equals the link
//! distance, so only the 3x3 neighborhood of each cell is tested. The result
//! is sorted and matches [`naive_links`] exactly. Distances so small that cell
//! coordinates leave the grid range use the pairwise scan instead.

use std::collections::HashMap;

use glam::Vec2;

use crate::simulation::particle::Particle;

/// Largest cell coordinate the grid indexes; beyond it cell keys lose precision
const MAX_GRID_CELL: f32 = (1u32 << 24) as f32;

/// Connection between two particles, `a < b` (indices into the particle slice)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

/// Connection between a particle and the cursor (grab mode)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorLink {
    pub particle: usize,
    pub cursor: Vec2,
    pub opacity: f32,
}

/// All links derived for one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Links {
    pub pairs: Vec<Link>,
    pub cursor: Vec<CursorLink>,
}

impl Links {
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.cursor.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.cursor.is_empty()
    }
}

/// `base * (1 - distance / max)`, clamped to `[0, base]`
pub fn link_opacity(base: f32, distance: f32, max_distance: f32) -> f32 {
    if !(max_distance > 0.0) {
        return 0.0;
    }
    let opacity = base * (1.0 - distance / max_distance);
    if opacity.is_finite() {
        opacity.clamp(0.0, base)
    } else {
        0.0
    }
}

/// Grid-accelerated link set
pub fn compute_links(particles: &[Particle], max_distance: f32, base_opacity: f32) -> Vec<Link> {
    if !(max_distance > 0.0) || !max_distance.is_finite() || particles.len() < 2 {
        return Vec::new();
    }

    let fits_grid = particles
        .iter()
        .filter(|p| p.position.is_finite())
        .all(|p| (p.position / max_distance).abs().max_element() < MAX_GRID_CELL);
    if !fits_grid {
        return naive_links(particles, max_distance, base_opacity);
    }

    let cell_of = |p: Vec2| -> (i64, i64) {
        (
            (p.x / max_distance).floor() as i64,
            (p.y / max_distance).floor() as i64,
        )
    };

    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, p) in particles.iter().enumerate() {
        if p.position.is_finite() {
            grid.entry(cell_of(p.position)).or_default().push(i);
        }
    }

    let mut links = Vec::new();
    for (i, p) in particles.iter().enumerate() {
        if !p.position.is_finite() {
            continue;
        }
        let (cx, cy) = cell_of(p.position);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(bucket) = grid.get(&(cx.saturating_add(dx), cy.saturating_add(dy))) else {
                    continue;
                };
                for &j in bucket {
                    if j <= i {
                        continue;
                    }
                    if let Some(link) = pair_link(particles, i, j, max_distance, base_opacity) {
                        links.push(link);
                    }
                }
            }
        }
    }

    links.sort_by(|l, r| (l.a, l.b).cmp(&(r.a, r.b)));
    links
}

/// O(n²) reference link set, ordered by `(a, b)`
pub fn naive_links(particles: &[Particle], max_distance: f32, base_opacity: f32) -> Vec<Link> {
    if !(max_distance > 0.0) || !max_distance.is_finite() {
        return Vec::new();
    }
    let mut links = Vec::new();
    for i in 0..particles.len() {
        if !particles[i].position.is_finite() {
            continue;
        }
        for j in (i + 1)..particles.len() {
            if let Some(link) = pair_link(particles, i, j, max_distance, base_opacity) {
                links.push(link);
            }
        }
    }
    links
}

fn pair_link(particles: &[Particle], i: usize, j: usize, max_distance: f32, base_opacity: f32) -> Option<Link> {
    let d = particles[i].position.distance(particles[j].position);
    if d <= max_distance {
        Some(Link {
            a: i,
            b: j,
            opacity: link_opacity(base_opacity, d, max_distance),
        })
    } else {
        None
    }
}

/// Links from every particle within `max_distance` of the cursor
pub fn cursor_links(particles: &[Particle], cursor: Vec2, max_distance: f32, base_opacity: f32) -> Vec<CursorLink> {
    if !(max_distance > 0.0) || !cursor.is_finite() {
        return Vec::new();
    }
    particles
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let d = p.position.distance(cursor);
            if d > max_distance {
                return None;
            }
            let opacity = link_opacity(base_opacity, d, max_distance);
            (opacity > 0.0).then_some(CursorLink {
                particle: i,
                cursor,
                opacity,
            })
        })
        .collect()
}
