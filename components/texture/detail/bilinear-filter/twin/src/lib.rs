//! Bilinear filter: turns a 2x2 texel cluster plus fractional position
//! into one filtered (or nearest) RGBA sample.
//!
//! `IDLE -> LERP1 -> LERP2 -> IDLE`, mirroring `texsample.py`'s filter
//! state machine. With filtering disabled the nearest corner is
//! forwarded on the same cycle the cache acks, skipping the pipeline.

use gs_twin_core::Rgba8888;

/// One cycle's input: whatever the uv-coord stage computed this cycle
/// (`px`, `py`) paired with the cache's cluster and ack for the same
/// request.
#[derive(Clone, Copy, Debug)]
pub struct FilterRequest {
    pub stb: bool,
    pub cache_ack: bool,
    pub cluster: [Rgba8888; 4],
    pub px: u16,
    pub py: u16,
    pub filter_enable: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FilterOutput {
    pub sample: Rgba8888,
    pub ack: bool,
}

#[derive(Clone, Copy, Debug, Default)]
enum State {
    #[default]
    Idle,
    Lerp1 { s0: [i32; 4], s2: [i32; 4], d0: [i32; 4], d1: [i32; 4], py: u16 },
    Lerp2 { dx0: [i32; 4], dy: [i32; 4], py: u16 },
}

fn channels(c: Rgba8888) -> [i32; 4] {
    [i32::from(c.r), i32::from(c.g), i32::from(c.b), i32::from(c.a)]
}

fn pack(ch: [i32; 4]) -> Rgba8888 {
    Rgba8888::new(saturate8(ch[0]), saturate8(ch[1]), saturate8(ch[2]), saturate8(ch[3]))
}

fn saturate8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

fn sub4(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
    std::array::from_fn(|i| a[i] - b[i])
}

fn add4(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
    std::array::from_fn(|i| a[i] + b[i])
}

fn scale4(d: [i32; 4], frac: u16) -> [i32; 4] {
    std::array::from_fn(|i| (d[i] * i32::from(frac)) >> 12)
}

/// `IDLE -> LERP1 -> LERP2 -> IDLE` bilinear interpolation pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct BilinearFilter {
    state: State,
}

impl BilinearFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(req: &FilterRequest) -> (State, Option<FilterOutput>) {
        if !(req.stb && req.cache_ack) {
            return (State::Idle, None);
        }
        if !req.filter_enable {
            return (State::Idle, Some(FilterOutput { sample: req.cluster[0], ack: true }));
        }
        let s0 = channels(req.cluster[0]);
        let s1 = channels(req.cluster[1]);
        let s2 = channels(req.cluster[2]);
        let s3 = channels(req.cluster[3]);
        let d0 = sub4(s1, s0);
        let d1 = sub4(s3, s2);
        (State::Lerp1 { s0, s2, d0, d1, py: req.py }, None)
    }

    pub fn tick(&mut self, req: FilterRequest) -> FilterOutput {
        let state = std::mem::take(&mut self.state);
        match state {
            State::Idle => {
                let (next, out) = Self::begin(&req);
                self.state = next;
                out.unwrap_or_default()
            }
            State::Lerp1 { s0, s2, d0, d1, py } => {
                let dx0 = add4(s0, scale4(d0, req.px));
                let dx1 = add4(s2, scale4(d1, req.px));
                let dy = sub4(dx1, dx0);
                self.state = State::Lerp2 { dx0, dy, py };
                FilterOutput::default()
            }
            State::Lerp2 { dx0, dy, py } => {
                let sample = pack(add4(dx0, scale4(dy, py)));
                let (next, _) = Self::begin(&req);
                self.state = next;
                FilterOutput { sample, ack: true }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_of(values: [u8; 4]) -> [Rgba8888; 4] {
        values.map(|v| Rgba8888::new(v, v, v, 255))
    }

    #[test]
    fn nearest_forwards_corner_zero_on_the_ack_cycle() {
        let mut filter = BilinearFilter::new();
        let req = FilterRequest {
            stb: true,
            cache_ack: true,
            cluster: cluster_of([10, 20, 30, 40]),
            px: 0,
            py: 0,
            filter_enable: false,
        };
        let out = filter.tick(req);
        assert!(out.ack);
        assert_eq!(out.sample.r, 10);
    }

    #[test]
    fn bilinear_takes_two_cycles_then_acks() {
        let mut filter = BilinearFilter::new();
        let req = FilterRequest {
            stb: true,
            cache_ack: true,
            cluster: cluster_of([0, 100, 0, 100]),
            px: 2048, // 0.5
            py: 2048,
            filter_enable: true,
        };
        let idle_req = FilterRequest { stb: false, ..req };
        let lerp1 = filter.tick(req);
        assert!(!lerp1.ack);
        let lerp2 = filter.tick(idle_req);
        assert!(!lerp2.ack);
        let done = filter.tick(idle_req);
        assert!(done.ack);
        // Bilinear blend of a checkerboard at the exact center is the average.
        assert_eq!(done.sample.r, 50);
    }

    #[test]
    fn zero_fraction_reproduces_the_top_left_corner() {
        let mut filter = BilinearFilter::new();
        let req = FilterRequest {
            stb: true,
            cache_ack: true,
            cluster: cluster_of([7, 200, 3, 250]),
            px: 0,
            py: 0,
            filter_enable: true,
        };
        let idle_req = FilterRequest { stb: false, ..req };
        filter.tick(req);
        filter.tick(idle_req);
        let done = filter.tick(idle_req);
        assert!(done.ack);
        assert_eq!(done.sample.r, 7);
    }
}
