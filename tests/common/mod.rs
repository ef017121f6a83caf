//! Synthetic GeoNames dumps shared by the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Random seed for reproducible fixtures
pub const RANDOM_SEED: u64 = 42;

pub const PLACE_COUNT: usize = 300;

/// `(iso, iso3, numeric, name, continent)`; ZZ has places but no country row
const COUNTRIES: &[(&str, &str, &str, &str, &str)] = &[
    ("US", "USA", "840", "United States", "NA"),
    ("CA", "CAN", "124", "Canada", "NA"),
    ("AU", "AUS", "036", "Australia", "OC"),
    ("FR", "FRA", "250", "France", "EU"),
];

/// `(key, name, asciiname, geonameid)`
pub const ADMIN1_ROWS: &[(&str, &str, &str, &str)] = &[
    ("US.06", "California", "California", "5332921"),
    ("US.NY", "New York", "New York", "5128638"),
    ("CA.01", "Alberta", "Alberta", "5883102"),
    ("CA.08", "Ontario", "Ontario", "6093943"),
    ("CA.06", "Northwest Territories", "Northwest Territories", "6091069"),
    ("AU.02", "New South Wales", "New South Wales", "2155400"),
    ("FR.11", "Île-de-France", "Ile-de-France", "3012874"),
];

/// Admin1 codes places are drawn from; `99` never has a division row
const PLACE_ADMIN1: &[(&str, &[&str])] = &[
    ("US", &["06", "NY", "99"]),
    ("CA", &["01", "08", "06", "99"]),
    ("AU", &["02", "99"]),
    ("FR", &["11"]),
    ("ZZ", &["01"]),
];

/// One generated city line
#[derive(Debug, Clone)]
pub struct Place {
    pub fields: Vec<String>,
}

impl Place {
    pub fn id(&self) -> i64 {
        self.fields[0].parse().unwrap()
    }

    pub fn asciiname(&self) -> &str {
        &self.fields[2]
    }

    pub fn country(&self) -> &str {
        &self.fields[8]
    }

    pub fn admin1(&self) -> &str {
        &self.fields[10]
    }

    pub fn line(&self) -> String {
        self.fields.join("\t")
    }
}

pub struct Fixture {
    pub country_txt: String,
    pub admin1_txt: String,
    pub cities_txt: String,
    pub places: Vec<Place>,
    /// 1-based line numbers of the broken lines in `cities_txt`
    pub malformed_city_lines: Vec<usize>,
}

impl Fixture {
    pub fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(RANDOM_SEED);

        let mut country_txt = String::from(
            "# GeoNames.org Country Information\n#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital\tArea(in sq km)\tPopulation\tContinent\ttld\tCurrencyCode\tCurrencyName\tPhone\tPostal Code Format\tPostal Code Regex\tLanguages\tgeonameid\tneighbours\tEquivalentFipsCode\n",
        );
        for (i, (iso, iso3, numeric, name, continent)) in COUNTRIES.iter().enumerate() {
            let geonameid = (6_252_001 + i).to_string();
            let fields = [
                *iso, *iso3, *numeric, *iso, *name, "Capital", "1000.0", "1000000",
                *continent, ".xx", "XXX", "Money", "+1", "#####", "^(\\d{5})$", "en",
                geonameid.as_str(),
                "", "",
            ];
            country_txt.push_str(&fields.join("\t"));
            country_txt.push('\n');
        }
        country_txt.push_str("XX\tonly\tthree\n");

        let mut admin1_txt = String::new();
        for (key, name, ascii, id) in ADMIN1_ROWS {
            admin1_txt.push_str(&format!("{}\t{}\t{}\t{}\n", key, name, ascii, id));
        }
        admin1_txt.push_str("BROKEN.01\tno geonameid\n");

        let mut places = Vec::with_capacity(PLACE_COUNT);
        let mut cities_txt = String::new();
        let mut malformed_city_lines = Vec::new();
        let mut line_no = 0;

        for i in 0..PLACE_COUNT {
            let (country, codes) = PLACE_ADMIN1.choose(&mut rng).unwrap();
            let admin1 = codes.choose(&mut rng).unwrap();
            let id = 1_000_000 + i as i64;
            let ascii = format!("Place {}", i);

            let fields: Vec<String> = vec![
                id.to_string(),
                format!("Plâce {}", i),
                ascii.clone(),
                format!("{},Alt {}", ascii, i),
                format!("{:.5}", rng.gen_range(-60.0f64..70.0)),
                format!("{:.5}", rng.gen_range(-170.0f64..170.0)),
                "P".to_string(),
                "PPL".to_string(),
                country.to_string(),
                String::new(),
                admin1.to_string(),
                String::new(),
                String::new(),
                String::new(),
                rng.gen_range(15_000..5_000_000).to_string(),
                if rng.gen_bool(0.5) {
                    rng.gen_range(0..3000).to_string()
                } else {
                    String::new()
                },
                rng.gen_range(0..3000).to_string(),
                "Etc/UTC".to_string(),
                "2024-03-01".to_string(),
            ];
            let place = Place { fields };

            cities_txt.push_str(&place.line());
            cities_txt.push('\n');
            line_no += 1;
            places.push(place);

            if i % 100 == 50 {
                cities_txt.push_str("999\ttruncated\tline\n");
                line_no += 1;
                malformed_city_lines.push(line_no);
            }
        }

        Self {
            country_txt,
            admin1_txt,
            cities_txt,
            places,
            malformed_city_lines,
        }
    }

    pub fn country_names(&self) -> Vec<(&'static str, &'static str)> {
        COUNTRIES.iter().map(|c| (c.0, c.3)).collect()
    }

    /// Places whose country and `<country>.<admin1>` key both exist
    pub fn indexable_ids(&self) -> HashSet<i64> {
        let countries: HashSet<&str> = COUNTRIES.iter().map(|c| c.0).collect();
        let keys: HashSet<&str> = ADMIN1_ROWS.iter().map(|a| a.0).collect();

        self.places
            .iter()
            .filter(|p| {
                countries.contains(p.country())
                    && keys.contains(format!("{}.{}", p.country(), p.admin1()).as_str())
            })
            .map(Place::id)
            .collect()
    }

    /// Write the three text dumps into `dir`
    pub fn write_text_files(&self, dir: &Path, cities_name: &str) {
        fs::write(dir.join("countryInfo.txt"), &self.country_txt).unwrap();
        fs::write(dir.join("admin1CodesASCII.txt"), &self.admin1_txt).unwrap();
        fs::write(dir.join(cities_name), &self.cities_txt).unwrap();
    }

    /// The cities dump packed the way the distribution point serves it
    pub fn cities_zip(&self, cities_name: &str) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(cities_name, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(self.cities_txt.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }
}
