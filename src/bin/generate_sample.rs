use std::io::Write;

use anyhow::{Context, Result};

use enforcement_dashboard::data::filter::ViolationKind;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Districts and the precincts that police them.
const AREAS: &[(&str, &[&str])] = &[
    ("東區", &["第一分局", "第六分局"]),
    ("南區", &["第五分局"]),
    ("中西區", &["第二分局"]),
    ("北區", &["第三分局", "第四分局"]),
    ("安平區", &["第四分局"]),
    ("安南區", &["第三分局"]),
    ("永康區", &["永康分局"]),
    ("歸仁區", &["歸仁分局"]),
];

const ROADS: &[&str] = &[
    "中華東路", "東門路", "林森路", "崇學路", "健康路",
    "府前路", "公園路", "安平路", "中正南路", "中山南路",
];

const DIRECTIONS: &[&str] = &["東向西", "西向東", "南向北", "北向南", "雙向"];

const SPEED_LIMITS: &[&str] = &["40", "50", "50", "60", "60", "70", "未設", ""];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "tainan_smart_enforcement.csv";

    let mut file = std::fs::File::create(output_path).context("creating output file")?;
    // Byte-order mark and padded headers, as in the published export.
    file.write_all("\u{feff}".as_bytes())?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([
        " 編號",
        "行政區",
        " 轄區分局 ",
        "設置位置",
        "速限 ",
        "拍攝行向",
    ])?;

    let mut rows = 0;
    for &(district, precincts) in AREAS {
        let devices = 6 + (rng.next_u64() % 10) as usize;
        for _ in 0..devices {
            let precinct = *rng.pick(precincts);
            let road = rng.pick(ROADS);
            let kind = rng.pick(&ViolationKind::ALL);
            // Some locations enforce two violations at once.
            let location = if rng.next_f64() < 0.3 {
                let second = rng.pick(&ViolationKind::ALL);
                format!("{road}({}、{})", kind.keyword(), second.keyword())
            } else {
                format!("{road}({})", kind.keyword())
            };
            rows += 1;
            writer.write_record([
                format!("TN{rows:04}").as_str(),
                district,
                precinct,
                location.as_str(),
                *rng.pick(SPEED_LIMITS),
                *rng.pick(DIRECTIONS),
            ])?;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} devices to {output_path}");
    Ok(())
}
