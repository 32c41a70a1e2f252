use log::debug;

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        #[derive(Debug)]
        pub struct DenoiserPasses {
            $( pub $name: $class, )*
        }

        impl Default for DenoiserPasses {
            fn default() -> Self {
                debug!("Initializing denoiser passes");

                Self {
                    $( $name: $class::new(), )*
                }
            }
        }
    };
}

passes!([
    atrous => AtrousPass,
    history => HistoryPass,
    modulation => ModulationPass,
    moment_filter => MomentFilterPass,
    reprojection => ReprojectionPass,
]);
