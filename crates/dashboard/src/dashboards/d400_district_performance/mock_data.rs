//! Karnataka district directory and reproducible demo metrics

use chrono::{Datelike, TimeZone, Utc};
use contracts::dashboards::d400_district_performance::{District, MonthlyMetricRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const KARNATAKA_DISTRICTS: &[(&str, &str, &str, &str)] = &[
    ("KA01", "Bagalkot", "ಬಾಗಲಕೋಟೆ", "Red soil"),
    ("KA02", "Bangalore Rural", "ಬೆಂಗಳೂರು ಗ್ರಾಮಾಂತರ", "Silk production"),
    ("KA03", "Bangalore Urban", "ಬೆಂಗಳೂರು ನಗರ", "IT Hub"),
    ("KA04", "Belgaum", "ಬೆಳಗಾವಿ", "Sugarcane"),
    ("KA05", "Bellary", "ಬಳ್ಳಾರಿ", "Iron ore"),
    ("KA06", "Bidar", "ಬೀದರ್", "Heritage monuments"),
    ("KA07", "Chamarajanagar", "ಚಾಮರಾಜನಗರ", "Bandipur forest"),
    ("KA08", "Chikkaballapur", "ಚಿಕ್ಕಬಳ್ಳಾಪುರ", "Nandi Hills"),
    ("KA09", "Chikkamagaluru", "ಚಿಕ್ಕಮಗಳೂರು", "Coffee plantations"),
    ("KA10", "Chitradurga", "ಚಿತ್ರದುರ್ಗ", "Fort"),
    ("KA11", "Dakshina Kannada", "ದಕ್ಷಿಣ ಕನ್ನಡ", "Coastal region"),
    ("KA12", "Davanagere", "ದಾವಣಗೆರೆ", "Cotton"),
    ("KA13", "Dharwad", "ಧಾರವಾಡ", "Educational hub"),
    ("KA14", "Gadag", "ಗದಗ", "Temples"),
    ("KA15", "Gulbarga", "ಗುಲಬರ್ಗಾ", "Historical"),
    ("KA16", "Hassan", "ಹಾಸನ", "Hoysala temples"),
    ("KA17", "Haveri", "ಹಾವೇರಿ", "Handloom"),
    ("KA18", "Kodagu", "ಕೊಡಗು", "Coffee & spices"),
    ("KA19", "Kolar", "ಕೋಲಾರ", "Gold mines"),
    ("KA20", "Koppal", "ಕೊಪ್ಪಳ", "Agriculture"),
    ("KA21", "Mandya", "ಮಂಡ್ಯ", "Sugar capital"),
    ("KA22", "Mysore", "ಮೈಸೂರು", "Palace city"),
    ("KA23", "Raichur", "ರಾಯಚೂರು", "Thermal power"),
    ("KA24", "Ramanagara", "ರಾಮನಗರ", "Silk cocoons"),
    ("KA25", "Shimoga", "ಶಿವಮೊಗ್ಗ", "Jog Falls"),
    ("KA26", "Tumkur", "ತುಮಕೂರು", "Coconut"),
    ("KA27", "Udupi", "ಉಡುಪಿ", "Krishna temple"),
    ("KA28", "Uttara Kannada", "ಉತ್ತರ ಕನ್ನಡ", "Western Ghats"),
    ("KA29", "Vijayapura", "ವಿಜಯಪುರ", "Gol Gumbaz"),
    ("KA30", "Yadgir", "ಯಾದಗಿರಿ", "Agriculture"),
];

pub fn karnataka_districts() -> Vec<District> {
    KARNATAKA_DISTRICTS
        .iter()
        .map(|(id, name_en, name_kn, feature)| District::new(id, name_en, name_kn, feature))
        .collect()
}

/// `months` consecutive monthly records per district, ending at
/// (`end_year`, `end_month`), newest first. Same seed, same data.
pub fn generate_metrics(
    districts: &[District],
    months: u32,
    end_year: i32,
    end_month: u32,
    seed: u64,
) -> Vec<MonthlyMetricRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut metrics = Vec::with_capacity(districts.len() * months as usize);

    for district in districts {
        for offset in 0..months {
            let (year, month) = months_back(end_year, end_month, offset);
            let target_job_days: u32 = rng.gen_range(80_000..=150_000);
            let low = (target_job_days as f64 * 0.6) as u32;
            let high = (target_job_days as f64 * 1.1) as u32;
            let actual_job_days: u32 = rng.gen_range(low..=high);
            let performance = actual_job_days as f64 / target_job_days as f64 * 100.0;
            let day: u32 = rng.gen_range(1..=28);

            let mut record = MonthlyMetricRecord::new(&district.id, year, month);
            record.timestamp = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single();
            record.total_job_days = actual_job_days as f64;
            record.target_job_days = Some(target_job_days as f64);
            record.households_covered = rng.gen_range(5_000..=15_000);
            record.wages = Some(actual_job_days as f64 * rng.gen_range(180.0..220.0));
            record.performance_index = Some((performance * 100.0).round() / 100.0);
            metrics.push(record);
        }
    }

    metrics
}

/// Records for the last `months` months up to the current one
pub fn generate_recent_metrics(districts: &[District], months: u32, seed: u64) -> Vec<MonthlyMetricRecord> {
    let today = Utc::now();
    generate_metrics(districts, months, today.year(), today.month(), seed)
}

fn months_back(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - offset as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
