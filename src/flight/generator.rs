//! Flight population and delay draws

use rand::Rng;
use tracing::debug;

use crate::engine::sampling;
use crate::flight::Flight;
use crate::passenger::PassengerFactory;
use crate::types::{delay_probability, FlightParameters};

/// Draws how many passengers a flight carries and whether it is delayed
#[derive(Debug, Clone)]
pub struct FlightGenerator {
    params: FlightParameters,
}

/// Passenger count decision for one flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadDraw {
    /// Whether the flight was sold above capacity
    pub is_overbooked: bool,
    /// Target over capacity
    pub overbooking_factor: f64,
    /// Load factor after clipping
    pub load_factor: f64,
    /// Passengers to generate
    pub passenger_count: u32,
}

impl FlightGenerator {
    /// Create a generator from flight parameters
    pub fn new(params: FlightParameters) -> Self {
        Self { params }
    }

    /// Decide the passenger count for an aircraft of `capacity` seats
    ///
    /// Overbooking inflates the target capacity; the load factor is a clipped
    /// normal draw; the count is a normal draw around `target * load` whose
    /// spread is a fraction of the mean with an absolute floor. The count is
    /// kept between one passenger and 5% above the target capacity.
    pub fn draw_load<R: Rng + ?Sized>(&self, rng: &mut R, capacity: u32) -> LoadDraw {
        let p = &self.params;
        let is_overbooked = sampling::bernoulli(rng, p.overbooking_chance);
        let overbooking_factor = if is_overbooked {
            1.0 + sampling::uniform(rng, 0.0, 1.0) * (p.max_overbooking_factor - 1.0)
        } else {
            1.0
        };
        let target = capacity as f64 * overbooking_factor;

        let load_factor = sampling::normal(rng, p.load_factor_mean, p.load_factor_stddev)
            .clamp(p.load_factor_min, p.load_factor_max);
        let mean = target * load_factor;
        let spread = if p.passenger_count_spread > 0.0 || p.passenger_count_min_stddev > 0.0 {
            (mean * p.passenger_count_spread).max(p.passenger_count_min_stddev)
        } else {
            0.0
        };

        let raw = sampling::normal(rng, mean, spread).round();
        let upper = (target * 1.05).floor().max(1.0);
        let passenger_count = raw.clamp(1.0, upper) as u32;

        LoadDraw { is_overbooked, overbooking_factor, load_factor, passenger_count }
    }

    /// Generate the passengers of a flight exactly once
    pub fn populate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        flight: &mut Flight,
        factory: &mut PassengerFactory,
    ) -> LoadDraw {
        let draw = self.draw_load(rng, flight.capacity);
        flight.is_overbooked = draw.is_overbooked;
        flight.overbooking_factor = draw.overbooking_factor;
        flight.load_factor = draw.load_factor;
        flight.passengers = factory.generate(rng, flight.key, draw.passenger_count);

        debug!(
            flight = %flight.flight_number,
            aircraft = %flight.aircraft_type,
            seats = flight.capacity,
            passengers = draw.passenger_count,
            load_factor = draw.load_factor,
            overbooked = draw.is_overbooked,
            "Generated passengers"
        );
        draw
    }

    /// Operational delay of a departure, zero when the delay model is off
    ///
    /// A delayed flight draws Gamma(2, average / 2), whose mean is the
    /// configured average delay.
    pub fn draw_delay<R: Rng + ?Sized>(&self, rng: &mut R, airline: &str) -> f64 {
        if !self.params.delays_enabled {
            return 0.0;
        }
        if !sampling::bernoulli(rng, delay_probability(airline)) {
            return 0.0;
        }
        sampling::gamma(rng, 2.0, self.params.average_delay / 2.0)
    }
}
