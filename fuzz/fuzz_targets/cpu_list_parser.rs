#![no_main]

use intercore::affinity::CpuList;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Must never panic, and accepted lists stay within the allowed set
        let allowed = CpuList::new((0..64).collect()).unwrap();
        if let Ok(list) = CpuList::parse(input, &allowed) {
            assert!(list.ids().iter().all(|&id| allowed.contains(id)));
        }
    }
});
