#[cfg(target_os = "linux")]
mod bench {
    use iai::black_box;
    use probe_map::LinearProbeMap;

    const OPS: usize = 1_000;

    fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
        std::iter::from_fn(move || {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
            Some(s)
        })
    }

    fn key(n: u64) -> String {
        format!("k{:016x}", n)
    }

    // Insert 1k entries, growing from the initial capacity.
    pub fn probe_map_put_1000_ops() {
        let mut m = LinearProbeMap::<String, u64>::new();
        for (i, x) in lcg(1).take(OPS).enumerate() {
            m.put(key(x), i as u64);
        }
        black_box(m);
    }

    // Repeated hits on existing keys.
    pub fn probe_map_get_hit_1000_ops() {
        let mut m = LinearProbeMap::new();
        let keys: Vec<_> = lcg(7).take(OPS * 2).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.put(k.clone(), i as u64);
        }
        let mut it = keys.iter().cycle();
        for _ in 0..OPS {
            let k = it.next().unwrap();
            black_box(m.get(k));
        }
    }

    // Repeated misses for keys unlikely to be present.
    pub fn probe_map_get_miss_1000_ops() {
        let mut m = LinearProbeMap::new();
        for (i, x) in lcg(11).take(OPS).enumerate() {
            m.put(key(x), i as u64);
        }
        let mut miss = lcg(0xdead_beef);
        for _ in 0..OPS {
            let k = key(miss.next().unwrap());
            black_box(m.get(&k));
        }
    }

    // Put/remove of one key: tombstone, then compaction, every round.
    pub fn probe_map_put_remove_1000_ops() {
        let mut m = LinearProbeMap::new();
        for _ in 0..OPS {
            m.put("k".to_string(), 1u64);
            black_box(m.remove("k"));
        }
    }
}

#[cfg(target_os = "linux")]
use bench::{
    probe_map_get_hit_1000_ops, probe_map_get_miss_1000_ops, probe_map_put_1000_ops,
    probe_map_put_remove_1000_ops,
};

#[cfg(target_os = "linux")]
iai::main!(
    probe_map_put_1000_ops,
    probe_map_get_hit_1000_ops,
    probe_map_get_miss_1000_ops,
    probe_map_put_remove_1000_ops
);

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("Skipping: iai benches require Linux/valgrind.");
}
