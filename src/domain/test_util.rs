use anyhow::anyhow;

/// Connectivity represents the "connected" state of a faked driven port. A disconnected port
/// fails every call, which is how tests exercise store outages.
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Return an error if connectivity is in a "disconnected" state
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not connect to the task store!")),
        }
    }
}

/// FakeImplementation stands in for a single function on a mocked trait. It records the
/// arguments of every call and hands back a preconfigured return value. Mocking crates
/// don't play well with `async fn` in traits, so mocks are written by hand with this.
///
/// * `Args` is whatever the mock captures from each call
/// * `Ret` is the function's return type
///
/// ```ignore
/// struct FakeStats {
///     count_result: FakeImplementation<bool, i64>,
/// }
///
/// impl StatsSource for Mutex<FakeStats> {
///     async fn count(&self, only_completed: bool) -> i64 {
///         let mut locked = self.lock().unwrap();
///         locked.count_result.save_arguments(only_completed);
///         locked.count_result.return_value()
///     }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    /// Saves arguments from a single invocation of the FakeImplementation
    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Returns the list of arguments passed on every call to this FakeImplementation
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

#[allow(dead_code)]
impl<Args, Ret> FakeImplementation<Args, Ret>
where
    Ret: Clone,
{
    /// Set the value that should be returned when this FakeImplementation is invoked
    pub fn set_return_value(&mut self, return_value: Ret) {
        self.return_value = Some(return_value)
    }

    /// Retrieve the configured return value for this FakeImplementation
    pub fn return_value(&self) -> Ret {
        match self.return_value {
            None => panic!("Tried to return from a function where the return value wasn't set!"),
            Some(ref ret_val) => ret_val.clone(),
        }
    }
}
