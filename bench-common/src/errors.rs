// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

error_chain! {
    links {
        Programs(bench_programs::errors::Error, bench_programs::errors::ErrorKind);
    }

    foreign_links {
        Config(config_crate::ConfigError);
        Io(::std::io::Error);
        Json(serde_json::Error);
    }

    errors {
        InvalidDomain(min: i32, max: i32) {
            description("empty or unbounded sweep domain"),
            display("sweep domain [{}, {}] is empty or has more than 2^64 sextuples", min, max),
        }
    }
}
