use orthoctl::latch::{LatchDecision, VolumeLatch};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_until_reading_reaches_reference() {
        let mut latch = VolumeLatch::new(Some(40), 3);

        assert_eq!(
            latch.observe(50),
            LatchDecision::Hold {
                reference: 40,
                distance: 10
            },
            "Reading far above the reference should be discarded"
        );
        assert_eq!(
            latch.observe(35),
            LatchDecision::Hold {
                reference: 40,
                distance: 5
            },
            "Reading still outside the window should be discarded"
        );
        assert!(!latch.is_latched());

        assert_eq!(
            latch.observe(38),
            LatchDecision::Engaged,
            "First reading within tolerance should engage the latch"
        );
        assert_eq!(
            latch.observe(41),
            LatchDecision::Pass,
            "Once engaged, every reading passes"
        );
        assert!(latch.is_latched());
    }

    #[test]
    fn test_never_engages_outside_tolerance() {
        let mut latch = VolumeLatch::new(Some(40), 3);

        for reading in [0, 10, 36, 44, 90, 100] {
            let decision = latch.observe(reading);
            assert!(
                !decision.passes(),
                "Reading {}% is outside 40±3 and should not pass",
                reading
            );
        }
        assert!(!latch.is_latched());
    }

    #[test]
    fn test_latches_immediately_without_reference() {
        let mut latch = VolumeLatch::new(None, 3);

        assert_eq!(
            latch.observe(20),
            LatchDecision::Engaged,
            "With no reference the very first reading should latch"
        );
        assert_eq!(latch.observe(99), LatchDecision::Pass);
    }

    #[test]
    fn test_boundary_distance_engages() {
        // Distance equal to the tolerance is inside the window.
        let mut latch = VolumeLatch::new(Some(40), 3);
        assert_eq!(latch.observe(43), LatchDecision::Engaged);

        let mut latch = VolumeLatch::new(Some(40), 3);
        assert_eq!(latch.observe(37), LatchDecision::Engaged);
    }

    #[test]
    fn test_zero_tolerance_requires_exact_match() {
        let mut latch = VolumeLatch::new(Some(40), 0);

        assert!(!latch.observe(39).passes());
        assert!(!latch.observe(41).passes());
        assert_eq!(latch.observe(40), LatchDecision::Engaged);
    }

    #[test]
    fn test_stays_engaged_for_far_readings() {
        let mut latch = VolumeLatch::new(Some(50), 3);
        latch.observe(50);
        assert!(latch.is_latched());

        for reading in [0, 100, 25, 75] {
            assert_eq!(
                latch.observe(reading),
                LatchDecision::Pass,
                "Engaged latch should pass {}% straight through",
                reading
            );
        }
    }

    #[test]
    fn test_reference_is_reported() {
        let latch = VolumeLatch::new(Some(64), 3);
        assert_eq!(latch.reference(), Some(64));

        let latch = VolumeLatch::new(None, 3);
        assert_eq!(latch.reference(), None);
    }
}
