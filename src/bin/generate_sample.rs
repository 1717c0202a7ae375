use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// `(region, town, lat range, lon range, max elevation)`
const REGIONS: [(&str, &str, (f64, f64), (f64, f64), f64); 7] = [
    ("US-MA", "Worcester", (41.5, 42.8), (-73.4, -70.0), 1200.0),
    ("US-CT", "Hartford", (41.0, 42.0), (-73.6, -71.8), 900.0),
    ("US-RI", "Providence", (41.3, 42.0), (-71.8, -71.1), 500.0),
    ("US-NH", "Concord", (42.7, 45.2), (-72.5, -70.7), 2400.0),
    ("US-VT", "Montpelier", (42.7, 45.0), (-73.4, -71.5), 2200.0),
    ("US-ME", "Bangor", (43.1, 47.4), (-71.0, -67.0), 1700.0),
    // out of region: dropped by the loader
    ("US-NY", "Albany", (40.5, 45.0), (-79.7, -73.3), 2000.0),
];

const TYPES: [&str; 7] = [
    "small_airport",
    "small_airport",
    "heliport",
    "seaplane_base",
    "medium_airport",
    "closed",
    "balloonport",
];

struct Row {
    name: String,
    latitude: Option<f64>,
    longitude: f64,
    region: String,
    facility_type: String,
    elevation: Option<f64>,
    municipality: String,
    scheduled_service: String,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let mut rows: Vec<Row> = Vec::new();

    for &(region, town, (lat_lo, lat_hi), (lon_lo, lon_hi), max_elev) in &REGIONS {
        for i in 0..12 {
            let facility_type = rng.pick(&TYPES).to_string();
            let scheduled = facility_type == "medium_airport" && rng.next_f64() < 0.6;
            rows.push(Row {
                name: format!("{town} Field {}", i + 1),
                // every 11th row lacks a position, every 13th an elevation
                latitude: (rows.len() % 11 != 10).then(|| rng.uniform(lat_lo, lat_hi)),
                longitude: rng.uniform(lon_lo, lon_hi),
                region: region.to_string(),
                facility_type,
                elevation: (rows.len() % 13 != 12).then(|| rng.uniform(-10.0, max_elev).round()),
                municipality: town.to_string(),
                scheduled_service: if scheduled { "yes" } else { "no" }.to_string(),
            });
        }
        rows.push(Row {
            name: format!("{town} International Airport"),
            latitude: Some(rng.uniform(lat_lo, lat_hi)),
            longitude: rng.uniform(lon_lo, lon_hi),
            region: region.to_string(),
            facility_type: "large_airport".to_string(),
            elevation: Some(rng.uniform(0.0, 400.0).round()),
            municipality: town.to_string(),
            scheduled_service: "yes".to_string(),
        });
    }

    write_csv(&rows, "sample_airports.csv");
    write_parquet(&rows, "sample_airports.parquet");

    println!(
        "Wrote {} airports to sample_airports.csv and sample_airports.parquet",
        rows.len()
    );
}

fn write_csv(rows: &[Row], output_path: &str) {
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create CSV file");
    writer
        .write_record([
            "name",
            "latitude_deg",
            "longitude_deg",
            "iso_region",
            "type",
            "elevation_ft",
            "municipality",
            "scheduled_service",
        ])
        .expect("Failed to write CSV header");

    for row in rows {
        writer
            .write_record([
                row.name.clone(),
                row.latitude.map(|v| format!("{v:.5}")).unwrap_or_default(),
                format!("{:.5}", row.longitude),
                row.region.clone(),
                row.facility_type.clone(),
                row.elevation.map(|v| v.to_string()).unwrap_or_default(),
                row.municipality.clone(),
                row.scheduled_service.clone(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

fn write_parquet(rows: &[Row], output_path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("latitude_deg", DataType::Float64, true),
        Field::new("longitude_deg", DataType::Float64, false),
        Field::new("iso_region", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("elevation_ft", DataType::Float64, true),
        Field::new("municipality", DataType::Utf8, false),
        Field::new("scheduled_service", DataType::Utf8, false),
    ]));

    let text = |f: fn(&Row) -> &str| {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.name.as_str()),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.latitude).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.longitude).collect::<Vec<_>>())),
            text(|r| r.region.as_str()),
            text(|r| r.facility_type.as_str()),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.elevation).collect::<Vec<_>>())),
            text(|r| r.municipality.as_str()),
            text(|r| r.scheduled_service.as_str()),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
