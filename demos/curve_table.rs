//! Curve table: Print every easing curve sampled across [0, 1].
//!
//! Handy when picking a curve name for the settings file.

use statfx::easing::reverse_lookup;
use statfx::Easing;

fn main() {
    const STEPS: usize = 10;

    print!("{:<20}", "curve");
    for step in 0..=STEPS {
        print!("{:>7.1}", step as f32 / STEPS as f32);
    }
    println!();
    println!("{}", "-".repeat(20 + 7 * (STEPS + 1)));

    for curve in Easing::ALL {
        print!("{:<20}", reverse_lookup(curve));
        for step in 0..=STEPS {
            print!("{:>7.3}", curve.apply(step as f32 / STEPS as f32));
        }
        if curve.overshoots() {
            print!("  (overshoots)");
        }
        println!();
    }
}
